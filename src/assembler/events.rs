use crate::assembler::PathMismatchError;

/// Side-channel notifications, see [`Assembler::subscribe`](crate::assembler::Assembler::subscribe).
#[derive(Debug, Clone)]
pub enum AssemblyEvent {
    /// A record was forwarded without tree insertion.
    PathMismatch(PathMismatchError),
    /// Named completion signal, published for each configured completion
    /// event when the names differ from the default.
    Signal { name: String },
    /// Every record is in the tree and the tree is sorted.
    Completed { stats: AssemblyStats },
}

/// Counters collected while assembling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub forwarded: usize,
    pub passed_through: usize,
    pub mismatched: usize,
    pub deferred: usize,
    pub inserted: usize,
    pub indexed: usize,
}
