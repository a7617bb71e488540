use crate::capability::{RelocationSet, Renameability, SourceAnalysis};
use crate::project_files::{discover_project_files, SourceFilter};
use crate::specifiers::{is_relative_specifier, render_specifier, resolve_specifier};
use crate::syntax::{parse_source, ParsedSource, RegionKind, Target};
use crate::{AnalysisError, Language, RawChange, ReferenceSpan, Result};
use modplan_config::PlanConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Syntax-aware, name-based analysis of JavaScript and TypeScript projects.
///
/// Files are parsed, and every identifier with the same text in a project
/// file counts as an occurrence. Module relocation rewrites relative
/// specifiers in `import`/`export ... from`, `require()`, `import()`,
/// `import x = require()` and `import()` types.
///
/// References are emitted file by file in sorted path order, and by ascending
/// offset within a file. Files that fail to parse are skipped.
#[derive(Debug, Clone)]
pub struct LexicalAnalysis {
    files: Vec<PathBuf>,
    resolve_extensions: Vec<String>,
}

impl LexicalAnalysis {
    /// Build the analysis for a project, enumerating its source files.
    ///
    /// `root` must be an absolute, normalized directory path.
    pub fn new(root: &Path, config: &PlanConfig) -> Result<Self> {
        let filter = SourceFilter::from_config(config)?;
        let files = discover_project_files(root, &filter)?;

        tracing::debug!(
            root = %root.display(),
            files = files.len(),
            "Built lexical analysis"
        );

        Ok(Self {
            files,
            resolve_extensions: config
                .resolve_extensions()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }

    /// Project files, plus `extra` when it is an existing file outside the project
    fn files_including(&self, extra: &Path) -> Vec<PathBuf> {
        let mut files = self.files.clone();
        if let Err(idx) = files.binary_search_by(|file| file.as_path().cmp(extra)) {
            if extra.is_file() {
                files.insert(idx, extra.to_path_buf());
            }
        }
        files
    }

    fn read(path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))
    }

    /// Contents of a source file, or `None` for other files and unreadable ones
    fn load(path: &Path, purpose: &str) -> Option<String> {
        Language::from_path(path)?;
        match fs::read_to_string(path) {
            Ok(source) => Some(source),
            Err(err) => {
                tracing::debug!(
                    file = %path.display(),
                    error = %err,
                    purpose,
                    "Skipping unreadable file"
                );
                None
            }
        }
    }

    fn parse<'s>(path: &Path, source: &'s str, purpose: &str) -> Option<ParsedSource<'s>> {
        let language = Language::from_path(path)?;
        match parse_source(language, source) {
            Ok(parsed) => Some(parsed),
            Err(failure) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %failure,
                    purpose,
                    "Skipping file with a syntax error"
                );
                None
            }
        }
    }
}

fn rejection_for(target: Target<'_>) -> Renameability {
    match target {
        Target::Identifier(_) => Renameability::renameable(),
        Target::Keyword(word) => {
            Renameability::rejected(format!("You cannot rename the keyword '{word}'."))
        }
        Target::Region(RegionKind::Number) => {
            Renameability::rejected("You cannot rename a numeric literal.")
        }
        Target::Region(RegionKind::String | RegionKind::Template) => {
            Renameability::rejected("You cannot rename a string literal.")
        }
        Target::Region(RegionKind::Regex) => {
            Renameability::rejected("You cannot rename a regular expression literal.")
        }
        Target::Region(RegionKind::JsxText) => {
            Renameability::rejected("You cannot rename text inside a JSX element.")
        }
        Target::Region(RegionKind::Comment) => {
            Renameability::rejected("You cannot rename text inside a comment.")
        }
        Target::Nothing => Renameability::unexplained(),
    }
}

impl SourceAnalysis for LexicalAnalysis {
    fn can_rename_at(&self, file: &Path, offset: usize) -> Result<Renameability> {
        let Some(language) = Language::from_path(file) else {
            return Ok(Renameability::rejected(format!(
                "Renaming is not supported for {}.",
                file.display()
            )));
        };

        let source = Self::read(file)?;
        let parsed = match parse_source(language, &source) {
            Ok(parsed) => parsed,
            Err(failure) => {
                return Ok(Renameability::rejected(format!(
                    "You cannot rename this element because the file has a syntax error: {}.",
                    failure.message
                )));
            }
        };

        Ok(rejection_for(parsed.target_at(offset)))
    }

    fn find_references(
        &self,
        file: &Path,
        offset: usize,
        include_strings: bool,
        include_comments: bool,
    ) -> Result<Vec<ReferenceSpan>> {
        let source = Self::read(file)?;
        let Some(parsed) = Self::parse(file, &source, "finding references") else {
            return Ok(Vec::new());
        };
        let Target::Identifier(name) = parsed.target_at(offset) else {
            return Ok(Vec::new());
        };

        let mut references = Vec::new();
        for path in self.files_including(file) {
            let spans = if path == file {
                parsed.occurrences(name, include_strings, include_comments)
            } else {
                let Some(text) = Self::load(&path, "finding references") else {
                    continue;
                };
                let Some(other) = Self::parse(&path, &text, "finding references") else {
                    continue;
                };
                other.occurrences(name, include_strings, include_comments)
            };

            references.extend(spans.into_iter().map(|span| ReferenceSpan::new(&path, span)));
        }

        tracing::debug!(name = %name, count = references.len(), "Found references");
        Ok(references)
    }

    fn edits_for_relocation_in_batch(
        &self,
        old_path: &Path,
        new_path: &Path,
        batch: &RelocationSet,
    ) -> Result<Vec<RawChange>> {
        let extensions: Vec<&str> = self.resolve_extensions.iter().map(String::as_str).collect();
        let new_dir = new_path.parent().unwrap_or(new_path);
        let mut changes = Vec::new();

        for path in self.files_including(old_path) {
            let is_moved_file = path == old_path;

            // Other files relocating in the same batch rewrite their own specifiers
            if !is_moved_file && batch.contains(&path) {
                continue;
            }

            let Some(source) = Self::load(&path, "computing relocation edits") else {
                continue;
            };
            let Some(parsed) = Self::parse(&path, &source, "computing relocation edits") else {
                continue;
            };

            for specifier in parsed.specifiers() {
                if !is_relative_specifier(&specifier.text) {
                    continue;
                }
                let Some(resolution) =
                    resolve_specifier(&path, &specifier.text, &extensions, Path::is_file)
                else {
                    continue;
                };

                let (from_dir, target) = if is_moved_file {
                    let target = if resolution.path == old_path {
                        new_path
                    } else {
                        batch.final_location(&resolution.path)
                    };
                    (new_dir, target)
                } else if resolution.path == old_path {
                    (path.parent().unwrap_or(&path), new_path)
                } else {
                    continue;
                };

                let rewritten = render_specifier(from_dir, target, resolution.style);
                if rewritten != specifier.text {
                    changes.push(RawChange::new(&path, specifier.span, rewritten));
                }
            }
        }

        tracing::debug!(
            from = %old_path.display(),
            to = %new_path.display(),
            changes = changes.len(),
            "Computed relocation edits"
        );
        Ok(changes)
    }

    fn list_project_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.files.clone())
    }
}
