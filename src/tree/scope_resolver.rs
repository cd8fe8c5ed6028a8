use std::path::MAIN_SEPARATOR;
use std::rc::Rc;

use tracing::debug;

use crate::tree::{NodeRef, TreeNode};

/// How a path segment is matched against existing folder names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentMatch {
    #[default]
    Exact,
    CaseInsensitive,
}

impl SegmentMatch {
    fn matches(self, folder: &str, segment: &str) -> bool {
        match self {
            SegmentMatch::Exact => folder == segment,
            SegmentMatch::CaseInsensitive => folder.to_lowercase() == segment.to_lowercase(),
        }
    }
}

/// Finds or creates the folder scope for a directory path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeResolver {
    segment_match: SegmentMatch,
    link_parents: bool,
}

impl ScopeResolver {
    pub fn new(segment_match: SegmentMatch, link_parents: bool) -> Self {
        Self {
            segment_match,
            link_parents,
        }
    }

    /// Walks `dir_path` from `root`, reusing the first folder child matching
    /// each segment and creating the missing ones. Empty segments are
    /// skipped, so an empty path resolves to `root` itself.
    pub fn resolve(&self, root: &NodeRef, dir_path: &str) -> NodeRef {
        segments(dir_path).fold(Rc::clone(root), |scope, segment| {
            self.find_child(&scope, segment)
                .unwrap_or_else(|| self.create_child(&scope, segment))
        })
    }

    fn find_child(&self, scope: &NodeRef, segment: &str) -> Option<NodeRef> {
        scope
            .borrow()
            .childs()?
            .iter()
            .find(|child| {
                child
                    .borrow()
                    .folder_name()
                    .is_some_and(|folder| self.segment_match.matches(folder, segment))
            })
            .cloned()
    }

    fn create_child(&self, scope: &NodeRef, segment: &str) -> NodeRef {
        debug!("Creating folder scope '{}'", segment);
        let child = TreeNode::folder(segment).into_ref();
        if self.link_parents {
            child.borrow_mut().set_parent(scope);
        }
        scope.borrow_mut().push_child(Rc::clone(&child));
        child
    }
}

/// Non-empty segments of a slash or platform separated path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', MAIN_SEPARATOR])
        .filter(|segment| !segment.is_empty())
}
