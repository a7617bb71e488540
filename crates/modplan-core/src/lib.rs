mod aggregate;
mod edit;
mod error;
mod line_index;
mod move_directory;
mod move_file;
mod rename;
mod session;
mod types;

pub use aggregate::{aggregate_changes, merge_file_edits};
pub use error::{ConversionError, PlanError, Result};
pub use line_index::{offset_to_position, position_to_offset, LineIndex};
pub use move_directory::{plan_directory_move, plan_directory_move_in, DirectoryMoveRequest};
pub use move_file::{plan_file_move, plan_file_move_in, FileMoveRequest};
pub use rename::{plan_rename, plan_rename_in, RenameOptions, RenameRequest};
pub use session::AnalysisSession;
pub use types::{FileTextEdits, FsMove, MovePlan, Position, Range, RenamePlan, TextEdit};

// Re-export common types from dependencies
pub use modplan_analysis::{
    OffsetSpan, RawChange, ReferenceSpan, RelocationSet, Renameability, SourceAnalysis,
};
pub use modplan_config::PlanConfig;
