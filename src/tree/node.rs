use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::tree::{Keys, Metadata, Value};

/// Shared handle to a tree node. Nodes are shared between the tree and the
/// records whose metadata they hold.
pub type NodeRef = Rc<RefCell<TreeNode>>;
pub type WeakNodeRef = Weak<RefCell<TreeNode>>;

/// A node of the assembled tree: the root, a folder scope or a record's
/// metadata object.
#[derive(Debug, Default)]
pub struct TreeNode {
    folder: Option<String>,
    childs: Option<Vec<NodeRef>>,
    index: Option<NodeRef>,
    parent: Option<WeakNodeRef>,
    fields: Metadata,
    attached: bool,
}

impl TreeNode {
    pub fn root() -> NodeRef {
        Self::default().into_ref()
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            folder: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_fields(fields: Metadata) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn into_ref(self) -> NodeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn folder_name(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Children in their current order, `None` until the first one is added.
    pub fn childs(&self) -> Option<&[NodeRef]> {
        self.childs.as_deref()
    }

    pub(crate) fn childs_mut(&mut self) -> Option<&mut Vec<NodeRef>> {
        self.childs.as_mut()
    }

    pub fn push_child(&mut self, child: NodeRef) {
        self.childs.get_or_insert_with(Vec::new).push(child);
    }

    pub fn index(&self) -> Option<&NodeRef> {
        self.index.as_ref()
    }

    /// Replaces the nested index descriptor, returning the previous one.
    pub fn set_index(&mut self, index: NodeRef) -> Option<NodeRef> {
        self.index.replace(index)
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_parent(&mut self, parent: &NodeRef) {
        self.parent = Some(Rc::downgrade(parent));
    }

    /// Flags the node as placed in a tree. Returns `false` if it already was.
    pub(crate) fn mark_attached(&mut self) -> bool {
        !std::mem::replace(&mut self.attached, true)
    }

    pub fn fields(&self) -> &Metadata {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.replace(key.into(), value.into());
    }

    /// Shallow copy of `fields` into this node; existing keys are overwritten
    /// in place, new keys are appended.
    pub fn merge(&mut self, fields: &Metadata) {
        for (key, value) in fields {
            self.fields.replace(key.clone(), value.clone());
        }
    }

    /// Value used when ordering this node among its siblings. The folder key
    /// resolves to the folder name, any other key to the matching field.
    pub fn sort_value(&self, key: &str, keys: &Keys) -> Option<Value> {
        if key == keys.folder {
            if let Some(folder) = &self.folder {
                return Some(Value::String(folder.clone()));
            }
        }
        self.fields.get(key).cloned()
    }

    /// Converts the subtree into a plain value using the configured key
    /// names. Parent links are rendered as the parent's folder name.
    pub fn to_value(&self, keys: &Keys) -> Value {
        let mut map = Metadata::new();
        if let Some(folder) = &self.folder {
            map.insert(keys.folder.clone(), Value::String(folder.clone()));
        }
        for (key, value) in &self.fields {
            map.replace(key.clone(), value.clone());
        }
        if let (Some(parent_key), Some(parent)) = (&keys.parent, self.parent()) {
            let parent_name = parent
                .borrow()
                .folder_name()
                .map(|name| Value::String(name.to_string()))
                .unwrap_or(Value::Null);
            map.replace(parent_key.clone(), parent_name);
        }
        if let Some(index) = &self.index {
            map.replace(keys.index.clone(), index.borrow().to_value(keys));
        }
        if let Some(childs) = &self.childs {
            let childs = childs
                .iter()
                .map(|child| child.borrow().to_value(keys))
                .collect();
            map.replace(keys.childs.clone(), Value::List(childs));
        }
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_child_creates_the_collection_lazily() {
        let root = TreeNode::root();
        assert!(root.borrow().childs().is_none());

        root.borrow_mut().push_child(TreeNode::folder("a").into_ref());
        root.borrow_mut().push_child(TreeNode::folder("b").into_ref());

        let root = root.borrow();
        let names: Vec<_> = root
            .childs()
            .unwrap()
            .iter()
            .map(|c| c.borrow().folder_name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn merge_overwrites_existing_fields_and_keeps_order() {
        let mut node = TreeNode::default();
        node.set("title", "old");
        node.set("draft", true);

        let mut incoming = Metadata::new();
        incoming.insert("title".to_string(), Value::from("new"));
        incoming.insert("weight".to_string(), Value::from(3_i64));
        node.merge(&incoming);

        let keys: Vec<_> = node.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["title", "draft", "weight"]);
        assert_eq!(node.get("title"), Some(&Value::from("new")));
    }

    #[test]
    fn parent_is_a_weak_link() {
        let parent = TreeNode::folder("docs").into_ref();
        let child = TreeNode::default().into_ref();
        child.borrow_mut().set_parent(&parent);

        assert!(Rc::ptr_eq(&child.borrow().parent().unwrap(), &parent));
        assert_eq!(Rc::strong_count(&parent), 1);

        drop(parent);
        assert!(child.borrow().parent().is_none());
    }

    #[test]
    fn sort_value_reads_folder_name_for_the_folder_key() {
        let keys = Keys::default();
        let folder = TreeNode::folder("guides");
        let mut leaf = TreeNode::default();
        leaf.set("name", "intro");

        assert_eq!(folder.sort_value("folder", &keys), Some(Value::from("guides")));
        assert_eq!(folder.sort_value("name", &keys), None);
        assert_eq!(leaf.sort_value("name", &keys), Some(Value::from("intro")));
    }

    #[test]
    fn to_value_uses_configured_key_names() {
        let keys = Keys {
            childs: "__childs".to_string(),
            parent: Some("up".to_string()),
            ..Keys::default()
        };
        let root = TreeNode::root();
        let folder = TreeNode::folder("test").into_ref();
        folder.borrow_mut().set_parent(&root);
        root.borrow_mut().push_child(folder.clone());
        let leaf = TreeNode::default().into_ref();
        leaf.borrow_mut().set("title", "leaf");
        leaf.borrow_mut().set_parent(&folder);
        folder.borrow_mut().push_child(leaf);

        let rendered = root.borrow().to_value(&keys);
        let root_map = rendered.as_map().unwrap();
        let Value::List(childs) = &root_map["__childs"] else {
            panic!("expected a child list");
        };
        let folder_map = childs[0].as_map().unwrap();
        assert_eq!(folder_map["folder"], Value::from("test"));
        assert_eq!(folder_map["up"], Value::Null);
        let Value::List(leaves) = &folder_map["__childs"] else {
            panic!("expected a child list");
        };
        assert_eq!(leaves[0].as_map().unwrap()["up"], Value::from("test"));
    }
}
