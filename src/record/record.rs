use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::record::ContentSignals;
use crate::tree::{Metadata, NodeRef, TreeNode};

/// When a record's metadata object becomes final.
#[derive(Debug, Clone)]
pub enum Contents {
    /// No payload at all; the record is only passed through.
    Empty,
    /// Metadata is final on arrival.
    Ready,
    /// Metadata is final once the source emits a completion event.
    Deferred(ContentSignals),
}

/// A file-like item flowing through the assembler.
#[derive(Debug, Clone)]
pub struct Record {
    path: PathBuf,
    base: Option<PathBuf>,
    contents: Contents,
    slots: HashMap<String, NodeRef>,
}

impl Record {
    pub fn new(path: impl Into<PathBuf>, contents: Contents) -> Self {
        Self {
            path: path.into(),
            base: None,
            contents,
            slots: HashMap::new(),
        }
    }

    pub fn ready(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Contents::Ready)
    }

    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Contents::Empty)
    }

    pub fn deferred(path: impl Into<PathBuf>, signals: ContentSignals) -> Self {
        Self::new(path, Contents::Deferred(signals))
    }

    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_metadata(self, key: impl Into<String>, metadata: Metadata) -> Self {
        self.with_metadata_node(key, TreeNode::with_fields(metadata).into_ref())
    }

    pub fn with_metadata_node(mut self, key: impl Into<String>, node: NodeRef) -> Self {
        self.slots.insert(key.into(), node);
        self
    }

    /// Points the slot `key` at `node`, returning the node it held before.
    pub fn set_metadata_node(&mut self, key: impl Into<String>, node: NodeRef) -> Option<NodeRef> {
        self.slots.insert(key.into(), node)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    pub fn metadata(&self, key: &str) -> Option<&NodeRef> {
        self.slots.get(key)
    }

    /// The metadata node stored under `key`, attaching an empty one first if
    /// the record has none.
    pub fn metadata_or_default(&mut self, key: &str) -> NodeRef {
        self.slots
            .entry(key.to_string())
            .or_insert_with(TreeNode::root)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Value;
    use std::rc::Rc;

    #[test]
    fn metadata_or_default_attaches_a_single_node() {
        let mut record = Record::ready("docs/a.md");
        assert!(record.metadata("metas").is_none());

        let first = record.metadata_or_default("metas");
        let second = record.metadata_or_default("metas");

        assert!(Rc::ptr_eq(&first, &second));
        assert!(Rc::ptr_eq(record.metadata("metas").unwrap(), &first));
    }

    #[test]
    fn with_metadata_keeps_supplied_fields() {
        let mut fields = Metadata::new();
        fields.insert("title".to_string(), Value::from("Hello"));
        let mut record = Record::ready("a.md").with_metadata("vars", fields);

        let node = record.metadata_or_default("vars");

        assert_eq!(node.borrow().get("title"), Some(&Value::from("Hello")));
        assert!(record.metadata("metas").is_none());
    }
}
