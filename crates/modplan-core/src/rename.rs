use crate::aggregate::aggregate_changes;
use crate::{AnalysisSession, ConversionError, LineIndex, Position, RenamePlan, Result};
use modplan_analysis::RawChange;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_REJECTION: &str = "You cannot rename this element.";

/// Where else to look for occurrences of the renamed name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameOptions {
    pub find_in_strings: bool,
    pub find_in_comments: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    /// Absolute, or relative to the project root
    pub file_path: PathBuf,
    pub position: Position,
    pub new_name: String,
    #[serde(default)]
    pub options: RenameOptions,
}

impl RenameRequest {
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>, position: Position, new_name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            position,
            new_name: new_name.into(),
            options: RenameOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: RenameOptions) -> Self {
        self.options = options;
        self
    }
}

/// Plan renaming the symbol at a position, opening a session for `project_root`
pub fn plan_rename(project_root: impl AsRef<Path>, request: &RenameRequest) -> Result<RenamePlan> {
    let session = AnalysisSession::open(project_root)?;
    plan_rename_in(&session, request)
}

/// Plan renaming the symbol at a position using an open session.
///
/// Nothing on disk is modified. Conditions a user can act on (missing file,
/// position outside the file, symbol not renameable) come back as a rejected
/// plan rather than an error.
pub fn plan_rename_in(session: &AnalysisSession, request: &RenameRequest) -> Result<RenamePlan> {
    let file = session.resolve_path(&request.file_path);
    tracing::info!(
        file = %file.display(),
        position = %request.position,
        new_name = %request.new_name,
        "Planning rename"
    );

    if !file.is_file() {
        return Ok(RenamePlan::rejected(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let text = match fs::read_to_string(&file) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(RenamePlan::rejected(format!(
                "File not found: {}",
                file.display()
            )));
        }
        Err(err) => return Err(err.into()),
    };

    let offset = match LineIndex::new(&text).position_to_offset(request.position) {
        Ok(offset) => offset,
        Err(err) => {
            tracing::debug!(error = %err, "Rename position does not map to an offset");
            let reason = match err {
                ConversionError::SplitsCharacter { .. } => format!(
                    "Position {} falls inside a character in {}",
                    request.position,
                    file.display()
                ),
                _ => format!(
                    "Position {} is outside of {}",
                    request.position,
                    file.display()
                ),
            };
            return Ok(RenamePlan::rejected(reason));
        }
    };

    let analysis = session.analysis();
    let renameability = analysis.can_rename_at(&file, offset)?;
    if !renameability.renameable {
        let reason = renameability
            .reason
            .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
        tracing::info!(reason = %reason, "Rename rejected");
        return Ok(RenamePlan::rejected(reason));
    }

    let references = analysis.find_references(
        &file,
        offset,
        request.options.find_in_strings,
        request.options.find_in_comments,
    )?;

    let changes: Vec<RawChange> = references
        .into_iter()
        .filter(|reference| {
            let exists = reference.file.is_file();
            if !exists {
                tracing::debug!(
                    file = %reference.file.display(),
                    "Skipping reference in a file that no longer exists"
                );
            }
            exists
        })
        .map(|reference| RawChange::new(reference.file, reference.span, request.new_name.as_str()))
        .collect();

    let edits = aggregate_changes(changes)?;
    tracing::info!(files = edits.len(), "Rename planned");
    Ok(RenamePlan::renameable(edits))
}
