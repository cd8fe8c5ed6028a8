use std::path::PathBuf;

use crate::application::data::ReadMode;
use crate::assembler::AssemblerOptions;
use crate::cli::Cli;
use crate::tree::SortOrder;

/// Settings of a single run, taken from the command line.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub mode: ReadMode,
    pub extension: String,
    pub base_prefix: Option<String>,
    pub index: Option<String>,
    pub sort_key: Option<String>,
    pub sort_desc: bool,
    pub parent_key: Option<String>,
}

impl RuntimeConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: None,
            mode: ReadMode::default(),
            extension: "md".to_string(),
            base_prefix: None,
            index: None,
            sort_key: None,
            sort_desc: false,
            parent_key: None,
        }
    }

    /// Command line flags win over the options file.
    pub fn apply(&self, mut options: AssemblerOptions) -> AssemblerOptions {
        if self.base_prefix.is_some() {
            options.base_prefix.clone_from(&self.base_prefix);
        }
        if self.index.is_some() {
            options.index.clone_from(&self.index);
        }
        if let Some(key) = &self.sort_key {
            options.sort = Some(SortOrder {
                key: key.clone(),
                descending: self.sort_desc,
            });
        }
        if self.parent_key.is_some() {
            options.keys.parent.clone_from(&self.parent_key);
        }
        options
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            config: cli.config,
            mode: cli.mode,
            extension: cli.extension,
            base_prefix: cli.base_prefix,
            index: cli.index,
            sort_key: cli.sort_key,
            sort_desc: cli.sort_desc,
            parent_key: cli.parent_key,
        }
    }
}
