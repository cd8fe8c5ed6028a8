use clap::ValueEnum;

/// How the front end hands file metadata to the assembler.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Records are pushed right away and populated by a background read.
    #[default]
    Stream,
    /// Files are read before their record is pushed.
    Buffer,
}
