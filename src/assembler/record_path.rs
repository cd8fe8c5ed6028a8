use std::path::Path;

use snafu::{Snafu, ensure};

use crate::ext::{normalize_path, relative_path, to_slash_string};
use crate::record::Record;
use crate::tree::{Keys, TreeNode, segments};

/// Directory of `record` relative to its own base, then stripped of
/// `base_prefix`. The result uses `/` separators and may keep a leading `/`
/// left over from the prefix.
pub fn scope_path(record: &Record, base_prefix: Option<&str>) -> Result<String, PathMismatchError> {
    let dir = record.path().parent().unwrap_or(Path::new(""));
    let dir = match record.base() {
        Some(base) => to_slash_string(&relative_path(dir, base)),
        None => to_slash_string(dir),
    };

    match base_prefix {
        Some(prefix) => {
            ensure!(
                dir.starts_with(prefix),
                PathMismatchSnafu {
                    path: dir.clone(),
                    base_prefix: prefix.to_string(),
                }
            );
            Ok(dir[prefix.len()..].to_string())
        }
        None => Ok(dir),
    }
}

/// Positional fields computed from a record's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    name: String,
    path: String,
    ext: String,
    href: String,
}

impl DerivedFields {
    pub fn new(file: &Path, scope_path: &str, ext_override: Option<&str>) -> Self {
        let name = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = match ext_override {
            Some(ext) => ext.to_string(),
            None => file
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default(),
        };
        let path = segments(scope_path).fold("/".to_string(), |mut path, segment| {
            path.push_str(segment);
            path.push('/');
            path
        });
        let href = format!(
            "/{}",
            to_slash_string(&normalize_path(Path::new(&format!("{path}{name}{ext}"))))
        );

        Self {
            name,
            path,
            ext,
            href,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn write(&self, node: &mut TreeNode, keys: &Keys) {
        node.set(keys.name.as_str(), self.name.as_str());
        node.set(keys.path.as_str(), self.path.as_str());
        node.set(keys.ext.as_str(), self.ext.as_str());
        node.set(keys.href.as_str(), self.href.as_str());
    }
}

#[derive(Debug, Clone, Snafu)]
#[snafu(display(
    "The base prefix '{}' does not fit the record directory '{}'",
    base_prefix,
    path
))]
pub struct PathMismatchError {
    path: String,
    base_prefix: String,
}

impl PathMismatchError {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn base_prefix(&self) -> &str {
        &self.base_prefix
    }
}
