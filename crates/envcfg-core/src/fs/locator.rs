//! Discovery of import files below a root folder.

use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use walkdir::WalkDir;

use super::depth::DepthRange;
use crate::error::{ImportError, Result};
use crate::types::FileFormat;

/// Immutable description of what to look for and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryQuery {
    root: PathBuf,
    format: FileFormat,
    depth: Option<DepthRange>,
}

impl DiscoveryQuery {
    /// Validate the root folder and build a query.
    ///
    /// Trailing separators are stripped before the folder is checked. The
    /// folder must be a readable directory.
    pub fn new(
        root: impl AsRef<Path>,
        format: FileFormat,
        depth: Option<DepthRange>,
    ) -> Result<Self> {
        let root = normalize_root(root.as_ref());
        if !root.is_dir() || fs::read_dir(&root).is_err() {
            return Err(ImportError::InvalidInput(format!(
                "Cannot access folder: {}",
                root.display()
            )));
        }
        Ok(Self {
            root,
            format,
            depth: depth.filter(|range| !range.is_empty()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn depth(&self) -> Option<&DepthRange> {
        self.depth.as_ref()
    }
}

fn normalize_root(root: &Path) -> PathBuf {
    let raw = root.to_string_lossy();
    let trimmed = raw.trim_end_matches(['/', MAIN_SEPARATOR]);
    if trimmed.is_empty() && !raw.is_empty() {
        // The filesystem root is all separators.
        return PathBuf::from(MAIN_SEPARATOR.to_string());
    }
    PathBuf::from(trimmed)
}

/// Scan the filesystem for files matching `query`.
///
/// Regular files only, symlinks followed, unreadable directories skipped.
/// Entries are sorted by file name inside each directory so the result is
/// stable for a given snapshot. Nothing is cached between calls.
pub fn locate(query: &DiscoveryQuery) -> Vec<PathBuf> {
    let suffix = format!(".{}", query.format.extension());

    // walkdir counts the root as depth 0, so a file directly inside it sits
    // at walkdir depth 1.
    let mut walker = WalkDir::new(&query.root)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name();

    if let Some(bound) = query.depth.as_ref().and_then(DepthRange::max_depth) {
        match bound {
            Some(max) => walker = walker.max_depth(max + 1),
            None => return Vec::new(),
        }
    }

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(&suffix))
        .filter(|entry| match &query.depth {
            Some(range) => range.matches(entry.depth() - 1),
            None => true,
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create_dir_all should succeed in test temp dirs");
        }
        fs::write(path, "{}").expect("write should succeed in test temp dirs");
    }

    #[test]
    fn missing_folder_is_invalid_input() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let err = DiscoveryQuery::new(tmp.path().join("missing"), FileFormat::Yaml, None)
            .expect_err("missing folder should fail");
        assert!(matches!(err, ImportError::InvalidInput(_)));
        assert!(err.to_string().contains("Cannot access folder"));
    }

    #[test]
    fn file_as_root_is_invalid_input() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let file = tmp.path().join("a.yaml");
        touch(&file);
        assert!(DiscoveryQuery::new(&file, FileFormat::Yaml, None).is_err());
    }

    #[test]
    fn trailing_separator_is_stripped() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let with_slash = format!("{}/", tmp.path().display());
        let query = DiscoveryQuery::new(&with_slash, FileFormat::Json, None)
            .expect("query should build");
        assert_eq!(query.root(), tmp.path());
    }

    #[test]
    fn filters_by_extension_recursively() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        touch(&tmp.path().join("a.yaml"));
        touch(&tmp.path().join("b.yml"));
        touch(&tmp.path().join("nested/c.yaml"));
        touch(&tmp.path().join("nested/d.json"));
        fs::create_dir_all(tmp.path().join("dir.yaml")).expect("mkdir should succeed");

        let query = DiscoveryQuery::new(tmp.path(), FileFormat::Yaml, None).unwrap();
        let files = locate(&query);

        assert_eq!(
            files,
            vec![tmp.path().join("a.yaml"), tmp.path().join("nested/c.yaml")]
        );
    }

    #[test]
    fn empty_folder_yields_nothing() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let query = DiscoveryQuery::new(tmp.path(), FileFormat::Json, None).unwrap();
        assert!(locate(&query).is_empty());
    }

    #[test]
    fn depth_lower_than_two_skips_deep_files() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        touch(&tmp.path().join("zero.json"));
        touch(&tmp.path().join("one/one.json"));
        touch(&tmp.path().join("one/two/two.json"));

        let depth = DepthRange::parse(["< 2"]).unwrap();
        let query = DiscoveryQuery::new(tmp.path(), FileFormat::Json, Some(depth)).unwrap();
        let files = locate(&query);

        assert_eq!(
            files,
            vec![tmp.path().join("one/one.json"), tmp.path().join("zero.json")]
        );
    }

    #[test]
    fn depth_lower_bound_skips_shallow_files() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        touch(&tmp.path().join("zero.json"));
        touch(&tmp.path().join("one/one.json"));
        touch(&tmp.path().join("one/two/two.json"));

        let depth = DepthRange::parse([">= 1", "<= 1"]).unwrap();
        let query = DiscoveryQuery::new(tmp.path(), FileFormat::Json, Some(depth)).unwrap();

        assert_eq!(locate(&query), vec![tmp.path().join("one/one.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_directories() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let outside = TempDir::new().expect("tempdir should succeed");
        touch(&outside.path().join("linked.yaml"));
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("link"))
            .expect("symlink should succeed");

        let query = DiscoveryQuery::new(tmp.path(), FileFormat::Yaml, None).unwrap();
        assert_eq!(locate(&query), vec![tmp.path().join("link/linked.yaml")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loops_and_dangling_links_are_skipped() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        touch(&tmp.path().join("a.yaml"));
        fs::create_dir_all(tmp.path().join("sub")).expect("create_dir_all should succeed");
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("sub/loop"))
            .expect("symlink should succeed");
        std::os::unix::fs::symlink(
            tmp.path().join("missing.yaml"),
            tmp.path().join("dangling.yaml"),
        )
        .expect("symlink should succeed");

        let query = DiscoveryQuery::new(tmp.path(), FileFormat::Yaml, None).unwrap();
        assert_eq!(locate(&query), vec![tmp.path().join("a.yaml")]);
    }
}
