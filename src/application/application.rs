use futures_channel::mpsc::UnboundedReceiver;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::application::data::ReadMode;
use crate::application::sources::{self, DiscoveryError};
use crate::assembler::{
    Assembler, AssemblerOptions, AssemblyEvent, CompletionError, CompletionReport,
    ConfigurationError,
};
use crate::config::{OptionsFile, OptionsFileError};
use crate::ext::BestEffortPathExt;
use crate::record::{ContentSignals, Record};
use crate::render::{RenderError, tree_to_yaml_string};
use crate::tree::TreeNode;

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let options = Self::load_options(&runtime_config).await?;
        let keys = options.keys.clone();

        let report = Self::assemble_directory(&runtime_config, options).await?;
        let output = tree_to_yaml_string(&report.root, &keys).context(RenderSnafu)?;
        print!("{output}");

        Ok(())
    }

    /// Defaults, then the options file, then the command line flags.
    pub async fn load_options(
        runtime_config: &RuntimeConfig,
    ) -> Result<AssemblerOptions, ApplicationError> {
        let options_file = match &runtime_config.config {
            Some(path) => OptionsFile::from_path(path).await,
            None => OptionsFile::read(&runtime_config.root).await,
        }
        .context(OptionsFileSnafu)?;
        debug!("Loaded options file: {:?}", options_file);

        let options = options_file.apply(AssemblerOptions::new(TreeNode::root()));
        Ok(runtime_config.apply(options))
    }

    /// Feeds every matching file below the root through an assembler and
    /// waits for the completed tree.
    pub async fn assemble_directory(
        runtime_config: &RuntimeConfig,
        options: AssemblerOptions,
    ) -> Result<CompletionReport, ApplicationError> {
        let root = &runtime_config.root;
        let metadata_key = options.keys.metadata.clone();
        let completion_events = options.completion_events.clone();

        let mut assembler = Assembler::new(options).context(AssemblerConfigurationSnafu)?;
        let mut events = assembler.subscribe();

        let files = sources::discover(root, &runtime_config.extension).context(DiscoverySnafu)?;
        for path in files {
            let record = match runtime_config.mode {
                ReadMode::Buffer => {
                    let metadata = sources::read_metadata(&path).await;
                    Record::ready(path).with_metadata(metadata_key.as_str(), metadata)
                }
                ReadMode::Stream => {
                    let signals = ContentSignals::new();
                    let node = TreeNode::root();
                    sources::spawn_metadata_reader(
                        path.clone(),
                        node.clone(),
                        signals.clone(),
                        completion_events.clone(),
                    );
                    Record::deferred(path, signals).with_metadata_node(metadata_key.as_str(), node)
                }
            };
            assembler.push(record.with_base(root));
        }

        let report = assembler.finish().await.context(CompletionSnafu)?;
        log_events(&mut events);
        info!(
            "Assembled {} record(s) below {}",
            report.stats.inserted + report.stats.indexed,
            root.best_effort_path_display()
        );
        Ok(report)
    }
}

fn log_events(events: &mut UnboundedReceiver<AssemblyEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            AssemblyEvent::PathMismatch(error) => warn!("Skipped a record: {}", error),
            AssemblyEvent::Signal { name } => debug!("Completion signal '{}'", name),
            AssemblyEvent::Completed { stats } => debug!("Completed with {:?}", stats),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading the options file"))]
    OptionsFileError { source: OptionsFileError },
    #[snafu(display("Invalid assembler options"))]
    AssemblerConfigurationError { source: ConfigurationError },
    #[snafu(display("Critical failure encountered while discovering files"))]
    DiscoveryError { source: DiscoveryError },
    #[snafu(display("Critical failure encountered while completing the tree"))]
    CompletionError { source: CompletionError },
    #[snafu(display("Failed to render the tree"))]
    RenderError { source: RenderError },
}
