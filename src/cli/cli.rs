use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{LogLevel, ReadMode};

/// Assembles the files below a directory into a tree and prints it as YAML.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// The directory to assemble
    #[clap(default_value = ".")]
    pub root: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Options file, defaults to vartree.yaml in the root directory
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    #[clap(long, short, default_value = "stream", value_enum)]
    pub mode: ReadMode,

    /// Extension of the files to pick up
    #[clap(long, short, default_value = "md")]
    pub extension: String,

    /// Directory prefix stripped from every record
    #[clap(long)]
    pub base_prefix: Option<String>,

    /// File stem that describes its own directory
    #[clap(long)]
    pub index: Option<String>,

    #[clap(long)]
    pub sort_key: Option<String>,

    #[clap(long, requires = "sort_key")]
    pub sort_desc: bool,

    /// Field name of parent references
    #[clap(long)]
    pub parent_key: Option<String>,
}
