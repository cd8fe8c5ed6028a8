use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::assembler::{AssemblerOptions, IndexPolicy};
use crate::ext::BestEffortPathExt;
use crate::tree::{SegmentMatch, SortOrder};

const OPTIONS_FILE_NAME: &str = "vartree.yaml";

fn get_options_file_path(root: &Path) -> PathBuf {
    root.join(OPTIONS_FILE_NAME)
}

/// Assembler options read from a YAML file. Every entry is optional and
/// only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsFile {
    pub childs_key: Option<String>,
    pub folder_key: Option<String>,
    pub parent_key: Option<String>,
    pub index_key: Option<String>,
    pub name_key: Option<String>,
    pub path_key: Option<String>,
    pub ext_key: Option<String>,
    pub href_key: Option<String>,
    pub metadata_key: Option<String>,
    pub base_prefix: Option<String>,
    pub index: Option<String>,
    pub index_policy: Option<IndexPolicy>,
    pub completion_events: Option<Vec<String>>,
    pub ext_value: Option<String>,
    pub sort_key: Option<String>,
    pub sort_descending: Option<bool>,
    pub case_insensitive: Option<bool>,
}

impl OptionsFile {
    /// Reads `vartree.yaml` from `root`; a missing file yields the defaults.
    pub async fn read(root: &Path) -> Result<Self, OptionsFileError> {
        let path = get_options_file_path(root);
        match Self::from_path(&path).await {
            Err(OptionsFileError::ReadError { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!(
                    "No options file at {}, using defaults",
                    path.best_effort_path_display()
                );
                Ok(Self::default())
            }
            result => result,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, OptionsFileError> {
        debug!("Reading options file: {}", path.best_effort_path_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read options file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).ok().context(NotUtf8Snafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    /// Overrides the matching fields of `options`.
    pub fn apply(&self, mut options: AssemblerOptions) -> AssemblerOptions {
        let keys = &mut options.keys;
        let overrides = [
            (&self.childs_key, &mut keys.childs),
            (&self.folder_key, &mut keys.folder),
            (&self.index_key, &mut keys.index),
            (&self.name_key, &mut keys.name),
            (&self.path_key, &mut keys.path),
            (&self.ext_key, &mut keys.ext),
            (&self.href_key, &mut keys.href),
            (&self.metadata_key, &mut keys.metadata),
        ];
        for (value, target) in overrides {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        if self.parent_key.is_some() {
            keys.parent.clone_from(&self.parent_key);
        }

        if self.base_prefix.is_some() {
            options.base_prefix.clone_from(&self.base_prefix);
        }
        if self.index.is_some() {
            options.index.clone_from(&self.index);
        }
        if let Some(policy) = self.index_policy {
            options.index_policy = policy;
        }
        if let Some(events) = &self.completion_events {
            options.completion_events.clone_from(events);
        }
        if self.ext_value.is_some() {
            options.ext_value.clone_from(&self.ext_value);
        }
        if let Some(key) = &self.sort_key {
            options.sort = Some(SortOrder {
                key: key.clone(),
                descending: self.sort_descending.unwrap_or_default(),
            });
        }
        if let Some(case_insensitive) = self.case_insensitive {
            options.segment_match = if case_insensitive {
                SegmentMatch::CaseInsensitive
            } else {
                SegmentMatch::Exact
            };
        }
        options
    }

    fn parse_entry(&mut self, key: &str, value: &Yaml) -> Result<(), OptionsFileError> {
        match key {
            "childrenKey" => self.childs_key = Some(expect_string(key, value)?),
            "segmentKey" => self.folder_key = Some(expect_string(key, value)?),
            "parentKey" => self.parent_key = Some(expect_string(key, value)?),
            "indexKey" => self.index_key = Some(expect_string(key, value)?),
            "nameKey" => self.name_key = Some(expect_string(key, value)?),
            "pathKey" => self.path_key = Some(expect_string(key, value)?),
            "extKey" => self.ext_key = Some(expect_string(key, value)?),
            "hrefKey" => self.href_key = Some(expect_string(key, value)?),
            "metadataKey" => self.metadata_key = Some(expect_string(key, value)?),
            "basePrefix" => self.base_prefix = Some(expect_string(key, value)?),
            "indexSegmentName" => self.index = Some(expect_string(key, value)?),
            "indexPolicy" => {
                self.index_policy = Some(match expect_string(key, value)?.as_str() {
                    "nested" => IndexPolicy::Nested,
                    "merge" => IndexPolicy::Merge,
                    _ => {
                        return InvalidValueSnafu {
                            key,
                            expected: "'nested' or 'merge'",
                        }
                        .fail();
                    }
                })
            }
            "completionEventNames" => self.completion_events = Some(expect_names(key, value)?),
            "extValue" => self.ext_value = Some(expect_string(key, value)?),
            "sortKey" => self.sort_key = Some(expect_string(key, value)?),
            "sortDescending" => self.sort_descending = Some(expect_bool(key, value)?),
            "caseInsensitive" => self.case_insensitive = Some(expect_bool(key, value)?),
            _ => debug!("Skipping unknown option '{}'", key),
        }
        Ok(())
    }

    fn parse_options_from_yaml(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Self, OptionsFileError> {
        top_level
            .iter()
            .filter_map(|(key, value)| match key {
                Yaml::Value(Scalar::String(name)) => Some((name, value)),
                _ => {
                    debug!("Skipping invalid option entry: {:?}", key);
                    None
                }
            })
            .try_fold(Self::default(), |mut acc, (name, value)| {
                acc.parse_entry(name, value)?;
                Ok(acc)
            })
    }
}

fn expect_string(key: &str, value: &Yaml) -> Result<String, OptionsFileError> {
    value
        .as_str()
        .map(str::to_string)
        .context(InvalidValueSnafu {
            key,
            expected: "a string",
        })
}

fn expect_bool(key: &str, value: &Yaml) -> Result<bool, OptionsFileError> {
    match value {
        Yaml::Value(Scalar::Boolean(flag)) => Ok(*flag),
        _ => InvalidValueSnafu {
            key,
            expected: "a boolean",
        }
        .fail(),
    }
}

/// A single name or a list of names.
fn expect_names(key: &str, value: &Yaml) -> Result<Vec<String>, OptionsFileError> {
    if let Some(name) = value.as_str() {
        return Ok(vec![name.to_string()]);
    }
    value
        .as_sequence()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .context(InvalidValueSnafu {
            key,
            expected: "a string or a list of strings",
        })
}

impl TryFrom<&str> for OptionsFile {
    type Error = OptionsFileError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let contents = contents_vec.first().context(MalformedConfigSnafu)?;

        let top_level = contents.as_mapping().context(TopLevelNotMapSnafu)?;

        Self::parse_options_from_yaml(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum OptionsFileError {
    #[snafu(display("Failed to read the options file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The options file is not valid UTF-8: {}", file_path))]
    NotUtf8 { file_path: String },
    #[snafu(display("Failed to parse the options file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted options file"))]
    MalformedConfig,
    #[snafu(display("Top level of the options file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Option '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: String },
}
