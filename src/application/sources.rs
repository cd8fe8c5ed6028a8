use std::path::{Path, PathBuf};

use compio::fs;
use compio::runtime::spawn;
use saphyr::{LoadableYamlNode, Yaml};
use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::ext::BestEffortPathExt;
use crate::record::ContentSignals;
use crate::render::metadata_from_mapping;
use crate::tree::{Metadata, NodeRef};

const FRONT_MATTER_FENCE: &str = "---";

/// Files below `root` with the given extension, in file name order.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.context(WalkSnafu {
            root: root.best_effort_path_display(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == extension)
        {
            files.push(path.to_path_buf());
        }
    }
    debug!(
        "Discovered {} '.{}' file(s) below {}",
        files.len(),
        extension,
        root.best_effort_path_display()
    );
    Ok(files)
}

/// YAML front matter of `contents`: a mapping between a leading `---` line
/// and the next `---` line. Anything else yields no metadata.
pub fn parse_front_matter(contents: &str) -> Metadata {
    let Some(block) = front_matter_block(contents) else {
        return Metadata::new();
    };
    match Yaml::load_from_str(block) {
        Ok(docs) => docs
            .first()
            .and_then(Yaml::as_mapping)
            .map(metadata_from_mapping)
            .unwrap_or_default(),
        Err(error) => {
            warn!("Ignoring unparsable front matter: {}", error);
            Metadata::new()
        }
    }
}

fn front_matter_block(contents: &str) -> Option<&str> {
    let mut lines = contents.split_inclusive('\n');
    if lines.next()?.trim_end() != FRONT_MATTER_FENCE {
        return None;
    }
    let start = contents.find('\n')? + 1;
    let mut offset = start;
    for line in lines {
        if line.trim_end() == FRONT_MATTER_FENCE {
            return Some(&contents[start..offset]);
        }
        offset += line.len();
    }
    None
}

/// Reads `path` and parses its front matter. Read failures are logged and
/// yield no metadata.
pub async fn read_metadata(path: &Path) -> Metadata {
    match fs::read(path).await {
        Ok(bytes) => parse_front_matter(&String::from_utf8_lossy(&bytes)),
        Err(error) => {
            warn!("Failed to read {}: {}", path.best_effort_path_display(), error);
            Metadata::new()
        }
    }
}

/// Populates `metadata` from `path` in the background, then emits every
/// event of `events` on `signals`.
pub fn spawn_metadata_reader(
    path: PathBuf,
    metadata: NodeRef,
    signals: ContentSignals,
    events: Vec<String>,
) {
    spawn(async move {
        let fields = read_metadata(&path).await;
        metadata.borrow_mut().merge(&fields);
        for event in &events {
            signals.emit(event);
        }
    })
    .detach();
}

#[derive(Debug, Snafu)]
pub enum DiscoveryError {
    #[snafu(display("Failed to walk the directory {}", root))]
    WalkError {
        root: String,
        source: walkdir::Error,
    },
}
