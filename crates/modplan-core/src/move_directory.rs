use crate::aggregate::merge_file_edits;
use crate::move_file::relocation_edits;
use crate::{AnalysisSession, FsMove, MovePlan, Result};
use modplan_analysis::RelocationSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryMoveRequest {
    /// Absolute, or relative to the project root
    pub old_dir: PathBuf,
    /// Absolute, or relative to the project root
    pub new_dir: PathBuf,
}

impl DirectoryMoveRequest {
    #[must_use]
    pub fn new(old_dir: impl Into<PathBuf>, new_dir: impl Into<PathBuf>) -> Self {
        Self {
            old_dir: old_dir.into(),
            new_dir: new_dir.into(),
        }
    }
}

/// Plan moving a directory, opening a session for `project_root`
pub fn plan_directory_move(
    project_root: impl AsRef<Path>,
    request: &DirectoryMoveRequest,
) -> Result<MovePlan> {
    let session = AnalysisSession::open(project_root)?;
    plan_directory_move_in(&session, request)
}

/// Plan moving every project file under a directory using an open session.
///
/// Only files the analysis reports as project files move; a directory with
/// none of them yields an empty plan. Each file keeps its path relative to the
/// directory, and the per-file relocations are planned as one batch so that
/// imports between moved files are left alone.
pub fn plan_directory_move_in(
    session: &AnalysisSession,
    request: &DirectoryMoveRequest,
) -> Result<MovePlan> {
    let old_dir = session.resolve_path(&request.old_dir);
    let new_dir = session.resolve_path(&request.new_dir);
    tracing::info!(
        from = %old_dir.display(),
        to = %new_dir.display(),
        "Planning directory move"
    );

    let batch = files_under(session, &old_dir, &new_dir)?;
    if batch.is_empty() {
        tracing::info!(dir = %old_dir.display(), "No project files under directory");
        return Ok(MovePlan::default());
    }

    let mut per_file = Vec::with_capacity(batch.len());
    for (from, to) in batch.iter() {
        per_file.push(relocation_edits(session, from, to, &batch)?);
    }
    let edits = merge_file_edits(per_file)?;

    tracing::info!(
        files = batch.len(),
        edited_files = edits.len(),
        "Directory move planned"
    );

    Ok(MovePlan {
        edits,
        fs_moves: batch.iter().map(|(from, to)| FsMove::new(from, to)).collect(),
    })
}

/// Project files strictly inside `old_dir`, each mapped to its destination
fn files_under(session: &AnalysisSession, old_dir: &Path, new_dir: &Path) -> Result<RelocationSet> {
    let mut batch = RelocationSet::new();

    for file in session.analysis().list_project_files()? {
        let Ok(relative) = file.strip_prefix(old_dir) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        batch.insert(&file, &new_dir.join(relative));
    }

    Ok(batch)
}
