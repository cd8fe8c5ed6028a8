use std::path::{Component, Path, PathBuf};

/// Canonical form of `path` when it exists, otherwise its absolute and
/// lexically normalized form.
pub fn best_effort_path_display(path: &Path) -> String {
    match path.canonicalize() {
        Ok(canonical_path) => canonical_path.display().to_string(),
        Err(_) => normalize_path(&absolute(path)).display().to_string(),
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(current_dir) => current_dir.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Path leading from `base` to `path`, with `..` steps where `path` lies
/// outside of `base`. Relative inputs are taken from the current directory
/// when only one side is absolute.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let (path, base) = if path.is_absolute() == base.is_absolute() {
        (normalize_path(path), normalize_path(base))
    } else {
        (normalize_path(&absolute(path)), normalize_path(&absolute(base)))
    };

    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();
    let common = path_components
        .iter()
        .zip(base_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    base_components[common..]
        .iter()
        .map(|_| Component::ParentDir)
        .chain(path_components[common..].iter().copied())
        .collect()
}

/// Joins the named components of `path` with `/`, dropping roots, prefixes
/// and `.` components.
pub fn to_slash_string(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("a/./b/../c", "a/c")]
    #[case("/a/../../b", "/b")]
    #[case("../a", "../a")]
    #[case("a/..", "")]
    fn normalize_resolves_dots(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_path(Path::new(input)), PathBuf::from(expected));
    }

    #[rstest]
    #[case("/site/docs/test", "/site/docs", "test")]
    #[case("/site/docs", "/site/docs", "")]
    #[case("/site/other", "/site/docs", "../other")]
    #[case("fixtures/test", "fixtures", "test")]
    #[case("a/b/c", "a/./x/..", "b/c")]
    fn relative_path_walks_from_base(#[case] path: &str, #[case] base: &str, #[case] expected: &str) {
        assert_eq!(
            relative_path(Path::new(path), Path::new(base)),
            PathBuf::from(expected)
        );
    }

    #[test]
    fn relative_path_mixes_absolute_and_relative_inputs() {
        let current_dir = std::env::current_dir().unwrap();
        let absolute = current_dir.join("docs/test");

        assert_eq!(
            relative_path(&absolute, Path::new("docs")),
            PathBuf::from("test")
        );
    }

    #[rstest]
    #[case("/a/b", "a/b")]
    #[case("./a/b/", "a/b")]
    #[case("../a", "../a")]
    #[case("", "")]
    fn slash_string_keeps_named_components(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_slash_string(Path::new(input)), expected);
    }

    #[test]
    fn best_effort_display_is_absolute() {
        let displayed = best_effort_path_display(Path::new("does/not/exist/../here"));

        assert!(Path::new(&displayed).is_absolute());
        assert!(displayed.ends_with("here"));
        assert!(!displayed.contains(".."));
    }
}
