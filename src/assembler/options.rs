use snafu::{OptionExt, Snafu, ensure};

use crate::tree::{Keys, NodeRef, SegmentMatch, SortOrder};

/// Event name a deferred record waits for unless configured otherwise.
pub const DEFAULT_COMPLETION_EVENT: &str = "end";

/// Where the metadata of an index record ends up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Stored as the scope's nested index descriptor.
    #[default]
    Nested,
    /// Shallow-copied into the scope node itself.
    Merge,
}

/// Construction-time configuration of an [`Assembler`](crate::assembler::Assembler).
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    pub root: Option<NodeRef>,
    pub keys: Keys,
    pub base_prefix: Option<String>,
    pub index: Option<String>,
    pub index_policy: IndexPolicy,
    pub completion_events: Vec<String>,
    pub ext_value: Option<String>,
    pub sort: Option<SortOrder>,
    pub segment_match: SegmentMatch,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            root: None,
            keys: Keys::default(),
            base_prefix: None,
            index: None,
            index_policy: IndexPolicy::default(),
            completion_events: vec![DEFAULT_COMPLETION_EVENT.to_string()],
            ext_value: None,
            sort: None,
            segment_match: SegmentMatch::default(),
        }
    }
}

impl AssemblerOptions {
    pub fn new(root: NodeRef) -> Self {
        Self::default().with_root(root)
    }

    pub fn with_root(mut self, root: NodeRef) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_keys(mut self, keys: Keys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_base_prefix(mut self, base_prefix: impl Into<String>) -> Self {
        self.base_prefix = Some(base_prefix.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_index_policy(mut self, index_policy: IndexPolicy) -> Self {
        self.index_policy = index_policy;
        self
    }

    pub fn with_completion_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.completion_events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ext_value(mut self, ext_value: impl Into<String>) -> Self {
        self.ext_value = Some(ext_value.into());
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_segment_match(mut self, segment_match: SegmentMatch) -> Self {
        self.segment_match = segment_match;
        self
    }

    pub fn has_default_completion_events(&self) -> bool {
        self.completion_events.len() == 1 && self.completion_events[0] == DEFAULT_COMPLETION_EVENT
    }

    /// Checks the options and splits off the root. An empty base prefix is
    /// the same as none.
    pub(crate) fn validate(mut self) -> Result<(NodeRef, Self), ConfigurationError> {
        let root = self.root.take().context(MissingRootSnafu)?;

        if let Some((name, _)) = self.keys.named().find(|(_, value)| value.is_empty()) {
            return EmptyKeySnafu { key: name }.fail();
        }
        ensure!(!self.completion_events.is_empty(), NoCompletionEventsSnafu);
        ensure!(
            self.completion_events.iter().all(|event| !event.is_empty()),
            EmptyEventNameSnafu
        );
        if let Some(sort) = &self.sort {
            ensure!(!sort.key.is_empty(), EmptySortKeySnafu);
        }
        if self.base_prefix.as_deref() == Some("") {
            self.base_prefix = None;
        }

        Ok((root, self))
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigurationError {
    #[snafu(display("Please provide a root node to put the tree in"))]
    MissingRoot,
    #[snafu(display("The '{}' option must not be empty", key))]
    EmptyKey { key: String },
    #[snafu(display("At least one completion event name is required"))]
    NoCompletionEvents,
    #[snafu(display("Completion event names must not be empty"))]
    EmptyEventName,
    #[snafu(display("The sort key must not be empty"))]
    EmptySortKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeNode;

    #[test]
    fn missing_root_is_rejected() {
        let result = AssemblerOptions::default().validate();

        assert!(matches!(result, Err(ConfigurationError::MissingRoot)));
    }

    #[test]
    fn empty_key_names_are_rejected() {
        let keys = Keys {
            childs: String::new(),
            ..Keys::default()
        };
        let result = AssemblerOptions::new(TreeNode::root()).with_keys(keys).validate();

        match result {
            Err(ConfigurationError::EmptyKey { key }) => assert_eq!(key, "childrenKey"),
            other => panic!("Expected EmptyKey, got {other:?}"),
        }
    }

    #[test]
    fn empty_parent_key_is_rejected() {
        let keys = Keys {
            parent: Some(String::new()),
            ..Keys::default()
        };
        let result = AssemblerOptions::new(TreeNode::root()).with_keys(keys).validate();

        assert!(matches!(result, Err(ConfigurationError::EmptyKey { .. })));
    }

    #[test]
    fn completion_events_must_be_present_and_named() {
        let none = AssemblerOptions::new(TreeNode::root())
            .with_completion_events(Vec::<String>::new())
            .validate();
        let blank = AssemblerOptions::new(TreeNode::root())
            .with_completion_events(["end", ""])
            .validate();

        assert!(matches!(none, Err(ConfigurationError::NoCompletionEvents)));
        assert!(matches!(blank, Err(ConfigurationError::EmptyEventName)));
    }

    #[test]
    fn empty_sort_key_is_rejected() {
        let result = AssemblerOptions::new(TreeNode::root())
            .with_sort(SortOrder::ascending(""))
            .validate();

        assert!(matches!(result, Err(ConfigurationError::EmptySortKey)));
    }

    #[test]
    fn empty_base_prefix_is_dropped() {
        let (_, options) = AssemblerOptions::new(TreeNode::root())
            .with_base_prefix("")
            .validate()
            .unwrap();

        assert_eq!(options.base_prefix, None);
        assert!(options.root.is_none());
    }

    #[test]
    fn default_completion_events_are_detected() {
        let options = AssemblerOptions::default();
        assert!(options.has_default_completion_events());

        let options = options.with_completion_events(["end", "metas"]);
        assert!(!options.has_default_completion_events());
    }
}
