//! Streaming assembly of records into a tree.

mod assembler;
mod completion;
mod events;
mod options;
mod record_path;

pub use assembler::{Assembler, CompletionError, CompletionReport};
pub use completion::{CompletionTracker, RecordId};
pub use events::{AssemblyEvent, AssemblyStats};
pub use options::{AssemblerOptions, ConfigurationError, DEFAULT_COMPLETION_EVENT, IndexPolicy};
pub use record_path::{DerivedFields, PathMismatchError, scope_path};
