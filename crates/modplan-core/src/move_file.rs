use crate::aggregate::aggregate_changes;
use crate::{AnalysisSession, FileTextEdits, FsMove, MovePlan, Result};
use modplan_analysis::RelocationSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMoveRequest {
    /// Absolute, or relative to the project root
    pub old_path: PathBuf,
    /// Absolute, or relative to the project root
    pub new_path: PathBuf,
}

impl FileMoveRequest {
    #[must_use]
    pub fn new(old_path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }
}

/// Plan moving one file, opening a session for `project_root`
pub fn plan_file_move(project_root: impl AsRef<Path>, request: &FileMoveRequest) -> Result<MovePlan> {
    let session = AnalysisSession::open(project_root)?;
    plan_file_move_in(&session, request)
}

/// Plan moving one file using an open session.
///
/// Edits target files at their current paths. The move itself is suggested as
/// a single [`FsMove`], whether or not `old_path` exists.
pub fn plan_file_move_in(session: &AnalysisSession, request: &FileMoveRequest) -> Result<MovePlan> {
    let old_path = session.resolve_path(&request.old_path);
    let new_path = session.resolve_path(&request.new_path);
    tracing::info!(
        from = %old_path.display(),
        to = %new_path.display(),
        "Planning file move"
    );

    let batch = RelocationSet::single(&old_path, &new_path);
    let edits = relocation_edits(session, &old_path, &new_path, &batch)?;

    Ok(MovePlan {
        edits,
        fs_moves: vec![FsMove::new(old_path, new_path)],
    })
}

/// Edits for relocating one file while everything in `batch` moves with it
pub(crate) fn relocation_edits(
    session: &AnalysisSession,
    old_path: &Path,
    new_path: &Path,
    batch: &RelocationSet,
) -> Result<Vec<FileTextEdits>> {
    let changes = session
        .analysis()
        .edits_for_relocation_in_batch(old_path, new_path, batch)?;
    aggregate_changes(changes)
}
