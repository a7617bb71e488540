use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Position in a document (0-indexed, character in UTF-16 code units)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// Range in a document; `start <= end`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the two ranges share any text. Adjacent ranges do not overlap,
    /// and an insertion only overlaps a range it falls strictly inside of.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Replace the text in `range` with `new_text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    #[must_use]
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }
}

/// Every edit planned for one file, in the order the analysis emitted them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTextEdits {
    /// Absolute path of the file, before any planned move
    pub file_path: PathBuf,
    pub text_edits: Vec<TextEdit>,
}

/// A suggested relocation of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsMove {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl FsMove {
    #[must_use]
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Result of planning a file or directory move
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePlan {
    pub edits: Vec<FileTextEdits>,
    pub fs_moves: Vec<FsMove>,
}

impl MovePlan {
    /// Total number of text edits across all files
    #[must_use]
    pub fn text_edit_count(&self) -> usize {
        self.edits.iter().map(|file| file.text_edits.len()).sum()
    }
}

/// Result of planning a rename.
///
/// Serializes as `{"canRename": true, "edits": [...]}` or
/// `{"canRename": false, "reason": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RenamePlanRepr", from = "RenamePlanRepr")]
pub enum RenamePlan {
    Renameable { edits: Vec<FileTextEdits> },
    Rejected { reason: String },
}

impl RenamePlan {
    #[must_use]
    pub const fn renameable(edits: Vec<FileTextEdits>) -> Self {
        Self::Renameable { edits }
    }

    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn can_rename(&self) -> bool {
        matches!(self, Self::Renameable { .. })
    }

    #[must_use]
    pub fn edits(&self) -> Option<&[FileTextEdits]> {
        match self {
            Self::Renameable { edits } => Some(edits),
            Self::Rejected { .. } => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Renameable { .. } => None,
            Self::Rejected { reason } => Some(reason),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenamePlanRepr {
    can_rename: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edits: Option<Vec<FileTextEdits>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<RenamePlan> for RenamePlanRepr {
    fn from(plan: RenamePlan) -> Self {
        match plan {
            RenamePlan::Renameable { edits } => Self {
                can_rename: true,
                edits: Some(edits),
                reason: None,
            },
            RenamePlan::Rejected { reason } => Self {
                can_rename: false,
                edits: None,
                reason: Some(reason),
            },
        }
    }
}

impl From<RenamePlanRepr> for RenamePlan {
    fn from(repr: RenamePlanRepr) -> Self {
        if repr.can_rename {
            Self::Renameable {
                edits: repr.edits.unwrap_or_default(),
            }
        } else {
            Self::Rejected {
                reason: repr.reason.unwrap_or_default(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: (usize, usize), end: (usize, usize)) -> Range {
        Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1))
    }

    #[test]
    fn test_position_ordering_is_lexicographic() {
        assert!(Position::new(0, 50) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
    }

    #[test]
    fn test_overlaps() {
        let base = range((1, 2), (1, 8));

        assert!(base.overlaps(&range((1, 5), (1, 10))));
        assert!(base.overlaps(&range((1, 4), (1, 4))));
        assert!(!base.overlaps(&range((1, 8), (1, 10))));
        assert!(!base.overlaps(&range((1, 2), (1, 2))));
        assert!(!base.overlaps(&range((2, 0), (2, 1))));
    }

    #[test]
    fn test_rename_plan_serialization() {
        let plan = RenamePlan::renameable(vec![FileTextEdits {
            file_path: PathBuf::from("/repo/foo.ts"),
            text_edits: vec![TextEdit::new(range((0, 9), (0, 20)), "fetchUserData")],
        }]);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["canRename"], true);
        assert_eq!(json["edits"][0]["filePath"], "/repo/foo.ts");
        assert_eq!(json["edits"][0]["textEdits"][0]["newText"], "fetchUserData");
        assert_eq!(json["edits"][0]["textEdits"][0]["range"]["start"]["character"], 9);
        assert!(json.get("reason").is_none());

        let rejected = serde_json::to_value(RenamePlan::rejected("nope")).unwrap();
        assert_eq!(
            rejected,
            serde_json::json!({ "canRename": false, "reason": "nope" })
        );
    }

    #[test]
    fn test_rename_plan_deserialization() {
        let plan: RenamePlan =
            serde_json::from_str(r#"{"canRename": false, "reason": "no symbol"}"#).unwrap();
        assert_eq!(plan.reason(), Some("no symbol"));
        assert!(plan.edits().is_none());
    }

    #[test]
    fn test_move_plan_serialization() {
        let plan = MovePlan {
            edits: Vec::new(),
            fs_moves: vec![FsMove::new("/repo/a.ts", "/repo/b.ts")],
        };

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "edits": [],
                "fsMoves": [{ "from": "/repo/a.ts", "to": "/repo/b.ts" }]
            })
        );
    }
}
