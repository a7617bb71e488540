use crate::{RawChange, ReferenceSpan, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Outcome of asking whether the symbol at an offset can be renamed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renameability {
    pub renameable: bool,
    /// Human-readable explanation when the symbol is not renameable
    pub reason: Option<String>,
}

impl Renameability {
    #[must_use]
    pub const fn renameable() -> Self {
        Self {
            renameable: true,
            reason: None,
        }
    }

    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            renameable: false,
            reason: Some(reason.into()),
        }
    }

    /// Not renameable, with no explanation to offer
    #[must_use]
    pub const fn unexplained() -> Self {
        Self {
            renameable: false,
            reason: None,
        }
    }
}

/// Every relocation requested together, keyed by current absolute path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationSet {
    moves: BTreeMap<PathBuf, PathBuf>,
}

impl RelocationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding one relocation
    #[must_use]
    pub fn single(old_path: &Path, new_path: &Path) -> Self {
        let mut set = Self::new();
        set.insert(old_path, new_path);
        set
    }

    pub fn insert(&mut self, old_path: &Path, new_path: &Path) {
        self.moves
            .insert(old_path.to_path_buf(), new_path.to_path_buf());
    }

    /// Whether `path` is being relocated as part of this set
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.moves.contains_key(path)
    }

    /// Where `path` ends up once every relocation in the set is applied
    #[must_use]
    pub fn final_location<'a>(&'a self, path: &'a Path) -> &'a Path {
        self.moves.get(path).map_or(path, PathBuf::as_path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.moves
            .iter()
            .map(|(from, to)| (from.as_path(), to.as_path()))
    }
}

/// A language-aware service that answers the semantic questions planners ask.
///
/// Offsets are UTF-16 code units relative to the text the analysis last read.
/// Implementations are used by one planning call at a time and must not be
/// shared between concurrent calls.
pub trait SourceAnalysis {
    /// Whether the symbol at `offset` in `file` can be renamed
    fn can_rename_at(&self, file: &Path, offset: usize) -> Result<Renameability>;

    /// Every location in the project that refers to the symbol at `offset`
    fn find_references(
        &self,
        file: &Path,
        offset: usize,
        include_strings: bool,
        include_comments: bool,
    ) -> Result<Vec<ReferenceSpan>>;

    /// Replacements needed when `old_path` moves to `new_path` on its own
    fn edits_for_relocation(&self, old_path: &Path, new_path: &Path) -> Result<Vec<RawChange>> {
        self.edits_for_relocation_in_batch(
            old_path,
            new_path,
            &RelocationSet::single(old_path, new_path),
        )
    }

    /// Replacements needed when `old_path` moves to `new_path` while every
    /// other file in `batch` moves in the same request.
    ///
    /// A specifier inside a file that is itself in `batch` is only rewritten by
    /// that file's own relocation, so each specifier is covered once.
    fn edits_for_relocation_in_batch(
        &self,
        old_path: &Path,
        new_path: &Path,
        batch: &RelocationSet,
    ) -> Result<Vec<RawChange>>;

    /// Absolute paths of every file the project considers a source file
    fn list_project_files(&self) -> Result<Vec<PathBuf>>;
}
