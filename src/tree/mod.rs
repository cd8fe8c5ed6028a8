//! In-memory tree assembled from record paths.
//!
//! Folder scopes are created lazily from slash delimited directory paths,
//! record metadata objects hang below them as children or index descriptors.

mod keys;
mod node;
mod scope_resolver;
mod sort;
mod value;

pub use keys::Keys;
pub use node::{NodeRef, TreeNode, WeakNodeRef};
pub use scope_resolver::{ScopeResolver, SegmentMatch, segments};
pub use sort::{SortOrder, sort_tree};
pub use value::{Metadata, Value};
