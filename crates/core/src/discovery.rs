//! Spec file discovery
//!
//! Finds the Galen suites matching the configured glob. Each match keeps its
//! path relative to the glob base so report directories can mirror the suite
//! layout.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use tracing::warn;

use crate::types::{RunnerError, RunnerResult};

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// A suite file matched by the suites glob
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpecFile {
    /// Path handed to Galen, relative to the project root Galen runs from.
    /// Matches outside the project root keep their full path.
    pub path: PathBuf,
    /// Path relative to the glob base, e.g. `usp/usp.spec.js`
    pub relative: PathBuf,
}

impl SpecFile {
    /// Where Galen should write this suite's HTML report
    pub fn report_path(&self, reports_dir: &Path) -> PathBuf {
        reports_dir.join(self.relative.with_extension(""))
    }

    /// Relative path rendered with forward slashes for messages
    pub fn display_relative(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Drop leading `./` segments, which never appear in walked paths
pub fn normalize_pattern(pattern: &str) -> &str {
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest.trim_start_matches('/');
    }
    pattern
}

/// The leading directory of a glob pattern that contains no glob syntax
pub fn glob_base(pattern: &str) -> PathBuf {
    let pattern = normalize_pattern(pattern);
    let mut segments: Vec<&str> = pattern.split('/').collect();
    // The last segment names files, never part of the base
    segments.pop();

    let mut base = if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    base.extend(
        segments
            .into_iter()
            .take_while(|segment| !segment.contains(GLOB_META))
            .filter(|segment| !segment.is_empty() && *segment != "."),
    );
    base
}

/// Find every file under `project_root` matching `pattern`, sorted by path.
///
/// Relative patterns are matched against paths relative to `project_root`;
/// absolute patterns against the full path. Symlinked directories are not
/// followed.
pub fn discover_spec_files(project_root: &Path, pattern: &str) -> RunnerResult<Vec<SpecFile>> {
    let pattern = normalize_pattern(pattern);
    let absolute = Path::new(pattern).is_absolute();
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| RunnerError::Glob(format!("Invalid suites glob '{}': {}", pattern, e)))?
        .compile_matcher();

    let base_dir = project_root.join(glob_base(pattern));
    let mut files = Vec::new();

    let mut queue = VecDeque::new();
    queue.push_back(base_dir.clone());

    while let Some(current_dir) = queue.pop_front() {
        let entries = match std::fs::read_dir(&current_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(RunnerError::Io(e)),
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", current_dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            if file_type.is_dir() {
                queue.push_back(path);
                continue;
            }
            // Symlinks count only when they point at a file
            if file_type.is_symlink() && !path.is_file() {
                continue;
            }

            let relative_to_root = path.strip_prefix(project_root).unwrap_or(&path);
            let candidate = if absolute { path.as_path() } else { relative_to_root };
            if !matcher.is_match(candidate) {
                continue;
            }

            let relative = path
                .strip_prefix(&base_dir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| relative_to_root.to_path_buf());

            files.push(SpecFile {
                path: relative_to_root.to_path_buf(),
                relative,
            });
        }
    }

    files.sort();
    tracing::debug!(count = files.len(), pattern, "discovered spec files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "test(\"x\", function () {});").unwrap();
    }

    #[test]
    fn test_glob_base() {
        assert_eq!(glob_base("tests/specs/**/*.spec.js"), PathBuf::from("tests/specs"));
        assert_eq!(glob_base("suites/*.js"), PathBuf::from("suites"));
        assert_eq!(glob_base("*.spec.js"), PathBuf::new());
        assert_eq!(glob_base("a/b[12]/c/*.js"), PathBuf::from("a"));
        assert_eq!(glob_base("./tests/specs/*.js"), PathBuf::from("tests/specs"));
        assert_eq!(glob_base("/srv/site/specs/*.js"), PathBuf::from("/srv/site/specs"));
    }

    #[test]
    fn test_report_path_strips_extension() {
        let file = SpecFile {
            path: PathBuf::from("tests/specs/usp/usp.spec.js"),
            relative: PathBuf::from("usp/usp.spec.js"),
        };
        assert_eq!(
            file.report_path(Path::new("reports")),
            PathBuf::from("reports/usp/usp.spec")
        );
        assert_eq!(file.display_relative(), "usp/usp.spec.js");
    }

    #[test]
    fn test_discover_matches_nested_suites_in_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "tests/specs/b.spec.js");
        touch(root, "tests/specs/usp/usp.spec.js");
        touch(root, "tests/specs/a.spec.js");
        touch(root, "tests/specs/usp/usp.spec");
        touch(root, "tests/specs/helper.js");
        touch(root, "other/x.spec.js");

        let files = discover_spec_files(root, "tests/specs/**/*.spec.js").unwrap();
        let relatives: Vec<String> = files.iter().map(SpecFile::display_relative).collect();

        assert_eq!(relatives, vec!["a.spec.js", "b.spec.js", "usp/usp.spec.js"]);
        assert_eq!(files[2].path, PathBuf::from("tests/specs/usp/usp.spec.js"));
    }

    #[test]
    fn test_discover_missing_base_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let files = discover_spec_files(temp_dir.path(), "tests/specs/**/*.spec.js").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_rejects_invalid_glob() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = discover_spec_files(temp_dir.path(), "tests/[specs/*.js").unwrap_err();
        assert!(matches!(err, RunnerError::Glob(_)));
    }

    #[test]
    fn test_discover_accepts_dotted_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        touch(temp_dir.path(), "tests/specs/a.spec.js");

        let files = discover_spec_files(temp_dir.path(), "./tests/specs/**/*.spec.js").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("tests/specs/a.spec.js"));
        assert_eq!(files[0].display_relative(), "a.spec.js");
    }

    #[test]
    fn test_discover_accepts_absolute_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "tests/specs/a.spec.js");
        touch(root, "tests/specs/usp/usp.spec.js");

        let pattern = format!("{}/tests/specs/**/*.spec.js", root.display());
        let files = discover_spec_files(root, &pattern).unwrap();
        let relatives: Vec<String> = files.iter().map(SpecFile::display_relative).collect();

        assert_eq!(relatives, vec!["a.spec.js", "usp/usp.spec.js"]);
        assert_eq!(files[0].path, PathBuf::from("tests/specs/a.spec.js"));
    }

    #[test]
    fn test_discover_from_relative_root_yields_root_relative_paths() {
        let temp_dir = tempfile::tempdir_in(".").unwrap();
        touch(temp_dir.path(), "tests/specs/a.spec.js");
        let root = PathBuf::from(".").join(temp_dir.path().file_name().unwrap());

        let files = discover_spec_files(&root, "tests/specs/**/*.spec.js").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("tests/specs/a.spec.js"));
        assert!(root.join(&files[0].path).is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_does_not_follow_symlinked_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "tests/specs/a/a.spec.js");
        touch(root, "tests/specs/b/b.spec.js");
        std::os::unix::fs::symlink(root.join("tests/specs/b"), root.join("tests/specs/a/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("tests/specs/a"), root.join("tests/specs/b/loop")).unwrap();
        std::os::unix::fs::symlink(
            root.join("tests/specs/a/a.spec.js"),
            root.join("tests/specs/linked.spec.js"),
        )
        .unwrap();

        let files = discover_spec_files(root, "tests/specs/**/*.spec.js").unwrap();
        let relatives: Vec<String> = files.iter().map(SpecFile::display_relative).collect();
        assert_eq!(relatives, vec!["a/a.spec.js", "b/b.spec.js", "linked.spec.js"]);
    }
}
