use crate::{AnalysisError, Result};
use glob::{MatchOptions, Pattern};
use modplan_config::PlanConfig;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Include/exclude filter compiled from a project's configuration
#[derive(Debug, Clone)]
pub struct SourceFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    /// Exclusions of the form `<dir>/**`, matched against directories to prune the walk
    exclude_dirs: Vec<Pattern>,
}

impl SourceFilter {
    pub fn from_config(config: &PlanConfig) -> Result<Self> {
        let mut include = Vec::new();
        for pattern in config.source_patterns() {
            for expanded in expand_braces(pattern) {
                include.push(compile(&expanded)?);
            }
        }

        let mut exclude = Vec::new();
        let mut exclude_dirs = Vec::new();
        for pattern in config.exclude_patterns() {
            for expanded in expand_braces(pattern) {
                if let Some(dir_pattern) = expanded.strip_suffix("/**") {
                    exclude_dirs.push(compile(dir_pattern)?);
                }
                exclude.push(compile(&expanded)?);
            }
        }

        Ok(Self {
            include,
            exclude,
            exclude_dirs,
        })
    }

    /// Whether a file, given relative to the project root, is a source file
    #[must_use]
    pub fn matches_file(&self, relative: &Path) -> bool {
        self.include
            .iter()
            .any(|pattern| pattern.matches_path_with(relative, MATCH_OPTIONS))
            && !self
                .exclude
                .iter()
                .any(|pattern| pattern.matches_path_with(relative, MATCH_OPTIONS))
    }

    fn prunes_dir(&self, relative: &Path) -> bool {
        self.exclude_dirs
            .iter()
            .any(|pattern| pattern.matches_path_with(relative, MATCH_OPTIONS))
    }
}

/// Enumerate every source file under `root`, as sorted absolute paths
pub fn discover_project_files(root: &Path, filter: &SourceFilter) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(AnalysisError::InvalidRoot(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            entry
                .path()
                .strip_prefix(root)
                .map_or(true, |relative| !filter.prunes_dir(relative))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable project entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if filter.matches_file(relative) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "Discovered project files");
    Ok(files)
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| AnalysisError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Expand brace patterns like `*.{ts,tsx}` into multiple patterns, since the
/// glob crate does not support them
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(start) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let Some(len) = pattern[start..].find('}') else {
        return vec![pattern.to_string()];
    };
    let end = start + len;

    let before = &pattern[..start];
    let after = &pattern[end + 1..];

    pattern[start + 1..end]
        .split(',')
        .flat_map(|option| expand_braces(&format!("{before}{option}{after}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("src/**/*.ts"), vec!["src/**/*.ts"]);
        assert_eq!(
            expand_braces("**/*.{ts,tsx}"),
            vec!["**/*.ts", "**/*.tsx"]
        );
        assert_eq!(
            expand_braces("{src,lib}/*.{js,ts}"),
            vec!["src/*.js", "src/*.ts", "lib/*.js", "lib/*.ts"]
        );
    }

    #[test]
    fn test_default_filter() {
        let filter = SourceFilter::from_config(&PlanConfig::default()).unwrap();

        assert!(filter.matches_file(Path::new("index.ts")));
        assert!(filter.matches_file(Path::new("src/feature/auth/hooks.tsx")));
        assert!(filter.matches_file(Path::new("lib/util.mjs")));
        assert!(!filter.matches_file(Path::new("src/styles.css")));
        assert!(!filter.matches_file(Path::new("node_modules/react/index.js")));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let config = PlanConfig {
            sources: Some(modplan_config::SourcesConfig::Pattern("src/[".to_string())),
            ..PlanConfig::default()
        };
        assert!(matches!(
            SourceFilter::from_config(&config),
            Err(AnalysisError::Pattern { .. })
        ));
    }

    #[test]
    fn test_discover_project_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "src/b.ts");
        touch(root, "src/a.ts");
        touch(root, "src/nested/c.js");
        touch(root, "src/readme.md");
        touch(root, "node_modules/pkg/index.js");

        let filter = SourceFilter::from_config(&PlanConfig::default()).unwrap();
        let files = discover_project_files(root, &filter).unwrap();

        assert_eq!(
            files,
            vec![
                root.join("src/a.ts"),
                root.join("src/b.ts"),
                root.join("src/nested/c.js"),
            ]
        );
    }

    #[test]
    fn test_discover_requires_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing");
        let filter = SourceFilter::from_config(&PlanConfig::default()).unwrap();

        assert!(matches!(
            discover_project_files(&missing, &filter),
            Err(AnalysisError::InvalidRoot(_))
        ));
    }
}
