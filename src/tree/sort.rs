use std::cmp::Ordering;

use crate::tree::{Keys, NodeRef, TreeNode};

/// Whole-tree ordering applied right before completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub key: String,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            descending: false,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            descending: true,
        }
    }

    fn compare(&self, a: &TreeNode, b: &TreeNode, keys: &Keys) -> Ordering {
        match (a.sort_value(&self.key, keys), b.sort_value(&self.key, keys)) {
            (Some(a), Some(b)) if self.descending => b.compare(&a),
            (Some(a), Some(b)) => a.compare(&b),
            // Missing keys go last whatever the direction.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Sorts every children collection below `node`, depth first. Returns the
/// number of nodes visited.
pub fn sort_tree(node: &NodeRef, order: &SortOrder, keys: &Keys) -> usize {
    let childs: Vec<NodeRef> = node.borrow().childs().map(<[_]>::to_vec).unwrap_or_default();
    let visited = childs
        .iter()
        .map(|child| sort_tree(child, order, keys))
        .sum::<usize>();

    if let Some(childs) = node.borrow_mut().childs_mut() {
        childs.sort_by(|a, b| order.compare(&a.borrow(), &b.borrow(), keys));
    }
    visited + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ScopeResolver, Value};
    use rstest::*;

    fn leaf(name: Option<&str>) -> NodeRef {
        let mut node = TreeNode::default();
        if let Some(name) = name {
            node.set("name", name);
        }
        node.set("label", name.unwrap_or("missing"));
        node.into_ref()
    }

    fn labels(node: &NodeRef) -> Vec<String> {
        node.borrow()
            .childs()
            .unwrap_or_default()
            .iter()
            .map(|c| {
                let c = c.borrow();
                c.get("label")
                    .and_then(Value::as_str)
                    .or(c.folder_name())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    fn root_with(names: &[Option<&str>]) -> NodeRef {
        let root = TreeNode::root();
        for name in names {
            root.borrow_mut().push_child(leaf(*name));
        }
        root
    }

    #[rstest]
    #[case(SortOrder::ascending("name"), vec!["a", "b", "c"])]
    #[case(SortOrder::descending("name"), vec!["c", "b", "a"])]
    fn sorts_by_key(#[case] order: SortOrder, #[case] expected: Vec<&str>) {
        let root = root_with(&[Some("b"), Some("a"), Some("c")]);

        sort_tree(&root, &order, &Keys::default());

        assert_eq!(labels(&root), expected);
    }

    #[rstest]
    #[case(SortOrder::ascending("name"), vec!["a", "b", "missing"])]
    #[case(SortOrder::descending("name"), vec!["b", "a", "missing"])]
    fn missing_keys_sort_last_in_both_directions(
        #[case] order: SortOrder,
        #[case] expected: Vec<&str>,
    ) {
        let root = root_with(&[None, Some("b"), Some("a")]);

        sort_tree(&root, &order, &Keys::default());

        assert_eq!(labels(&root), expected);
    }

    #[test]
    fn ties_keep_their_arrival_order() {
        let root = TreeNode::root();
        for label in ["first", "second", "third"] {
            let mut node = TreeNode::default();
            node.set("name", "same");
            node.set("label", label);
            root.borrow_mut().push_child(node.into_ref());
        }

        sort_tree(&root, &SortOrder::ascending("name"), &Keys::default());

        assert_eq!(labels(&root), vec!["first", "second", "third"]);
    }

    #[test]
    fn sorts_every_level_and_visits_each_node_once() {
        let root = TreeNode::root();
        let resolver = ScopeResolver::default();
        let nested = resolver.resolve(&root, "z/y");
        for name in ["2", "1"] {
            nested.borrow_mut().push_child(leaf(Some(name)));
        }
        root.borrow_mut().push_child(leaf(Some("b")));
        root.borrow_mut().push_child(leaf(Some("a")));

        let visited = sort_tree(&root, &SortOrder::ascending("name"), &Keys::default());

        // root, z, y and four leaves
        assert_eq!(visited, 7);
        assert_eq!(labels(&root), vec!["a", "b", "z"]);
        assert_eq!(labels(&nested), vec!["1", "2"]);
    }

    #[test]
    fn folder_key_sorts_folders_by_name() {
        let root = TreeNode::root();
        let resolver = ScopeResolver::default();
        resolver.resolve(&root, "beta");
        resolver.resolve(&root, "alpha");

        sort_tree(&root, &SortOrder::ascending("folder"), &Keys::default());

        assert_eq!(labels(&root), vec!["alpha", "beta"]);
    }
}
