use crate::{FileTextEdits, LineIndex, PlanError, Range, Result, TextEdit};
use modplan_analysis::RawChange;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Group raw changes by file and convert their offsets to positions.
///
/// Files appear in the order their first change was emitted, and edits keep
/// their emission order within each file. Each file is read once. A file that
/// can no longer be read, or a change whose span does not fit the current
/// text, is skipped with a warning.
pub fn aggregate_changes(changes: Vec<RawChange>) -> Result<Vec<FileTextEdits>> {
    let mut groups: Vec<(PathBuf, Vec<RawChange>)> = Vec::new();
    let mut group_index: HashMap<PathBuf, usize> = HashMap::new();

    for change in changes {
        if let Some(&index) = group_index.get(&change.file) {
            groups[index].1.push(change);
        } else {
            group_index.insert(change.file.clone(), groups.len());
            groups.push((change.file.clone(), vec![change]));
        }
    }

    let mut result = Vec::with_capacity(groups.len());
    for (file, changes) in groups {
        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    file = %file.display(),
                    error = %err,
                    "Skipping edits for unreadable file"
                );
                continue;
            }
        };

        let index = LineIndex::new(&text);
        let mut text_edits = Vec::with_capacity(changes.len());
        for change in changes {
            match index.span_to_range(change.span) {
                Ok(range) => text_edits.push(TextEdit::new(range, change.new_text)),
                Err(err) => tracing::warn!(
                    file = %file.display(),
                    start = change.span.start,
                    end = change.span.end,
                    error = %err,
                    "Skipping edit that does not fit the file"
                ),
            }
        }

        if text_edits.is_empty() {
            continue;
        }
        check_overlaps(&file, &text_edits)?;
        result.push(FileTextEdits {
            file_path: file,
            text_edits,
        });
    }

    Ok(result)
}

/// Concatenate per-file edit lists from several plans.
///
/// Lists for the same path are joined in the order given, so edits keep the
/// order each plan emitted them in. Exact duplicates are kept.
pub fn merge_file_edits<I>(plans: I) -> Result<Vec<FileTextEdits>>
where
    I: IntoIterator<Item = Vec<FileTextEdits>>,
{
    let mut merged: Vec<FileTextEdits> = Vec::new();
    let mut merged_index: HashMap<PathBuf, usize> = HashMap::new();

    for plan in plans {
        for file_edits in plan {
            if let Some(&index) = merged_index.get(&file_edits.file_path) {
                merged[index].text_edits.extend(file_edits.text_edits);
            } else {
                merged_index.insert(file_edits.file_path.clone(), merged.len());
                merged.push(file_edits);
            }
        }
    }

    for file_edits in &merged {
        check_overlaps(&file_edits.file_path, &file_edits.text_edits)?;
    }
    Ok(merged)
}

/// Reject edits whose ranges partially overlap. Identical ranges may coincide.
pub(crate) fn check_overlaps(file: &Path, edits: &[TextEdit]) -> Result<()> {
    let mut ranges: Vec<Range> = edits.iter().map(|edit| edit.range).collect();
    ranges.sort();

    let mut widest: Option<Range> = None;
    for range in ranges {
        if let Some(previous) = widest {
            if previous != range && previous.overlaps(&range) {
                return Err(PlanError::OverlappingEdits {
                    file: file.to_path_buf(),
                    first: previous,
                    second: range,
                });
            }
            if range.end > previous.end {
                widest = Some(range);
            }
        } else {
            widest = Some(range);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use modplan_analysis::OffsetSpan;
    use std::fs;
    use tempfile::TempDir;

    fn edit(start: usize, end: usize, text: &str) -> TextEdit {
        TextEdit::new(
            Range::new(Position::new(0, start), Position::new(0, end)),
            text,
        )
    }

    #[test]
    fn test_groups_by_file_in_first_appearance_order() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.ts");
        let b = temp.path().join("b.ts");
        fs::write(&a, "foo();\nfoo();\n").unwrap();
        fs::write(&b, "foo;\n").unwrap();

        let edits = aggregate_changes(vec![
            RawChange::new(&b, OffsetSpan::new(0, 3), "bar"),
            RawChange::new(&a, OffsetSpan::new(7, 10), "bar"),
            RawChange::new(&a, OffsetSpan::new(0, 3), "bar"),
        ])
        .unwrap();

        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].file_path, b);
        assert_eq!(edits[1].file_path, a);
        // emission order is kept, not sorted
        assert_eq!(edits[1].text_edits[0].range.start, Position::new(1, 0));
        assert_eq!(edits[1].text_edits[1].range.start, Position::new(0, 0));
    }

    #[test]
    fn test_skips_missing_file() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("present.ts");
        fs::write(&present, "x").unwrap();

        let edits = aggregate_changes(vec![
            RawChange::new(temp.path().join("gone.ts"), OffsetSpan::new(0, 1), "y"),
            RawChange::new(&present, OffsetSpan::new(0, 1), "y"),
        ])
        .unwrap();

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].file_path, present);
    }

    #[test]
    fn test_skips_span_past_end_of_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("short.ts");
        fs::write(&file, "ab").unwrap();

        let edits =
            aggregate_changes(vec![RawChange::new(&file, OffsetSpan::new(1, 10), "z")]).unwrap();
        assert!(edits.is_empty());
    }

    #[test]
    fn test_rejects_partial_overlap() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.ts");
        fs::write(&file, "abcdefgh").unwrap();

        let err = aggregate_changes(vec![
            RawChange::new(&file, OffsetSpan::new(0, 4), "x"),
            RawChange::new(&file, OffsetSpan::new(2, 6), "y"),
        ])
        .unwrap_err();

        assert!(matches!(err, PlanError::OverlappingEdits { .. }));
    }

    #[test]
    fn test_check_overlaps_allows_identical_and_adjacent() {
        let file = Path::new("/p/a.ts");
        assert!(check_overlaps(file, &[edit(0, 3, "a"), edit(0, 3, "a")]).is_ok());
        assert!(check_overlaps(file, &[edit(3, 6, "a"), edit(0, 3, "b")]).is_ok());
        assert!(check_overlaps(file, &[edit(0, 0, "a"), edit(0, 3, "b")]).is_ok());
    }

    #[test]
    fn test_check_overlaps_finds_nested_range() {
        let file = Path::new("/p/a.ts");
        let err = check_overlaps(
            file,
            &[edit(0, 10, "a"), edit(2, 3, "b"), edit(12, 14, "c")],
        )
        .unwrap_err();

        assert!(matches!(err, PlanError::OverlappingEdits { .. }));
    }

    #[test]
    fn test_merge_file_edits_concatenates_by_path() {
        let a = PathBuf::from("/p/a.ts");
        let b = PathBuf::from("/p/b.ts");

        let merged = merge_file_edits(vec![
            vec![FileTextEdits {
                file_path: a.clone(),
                text_edits: vec![edit(5, 7, "x")],
            }],
            vec![
                FileTextEdits {
                    file_path: b.clone(),
                    text_edits: vec![edit(0, 1, "y")],
                },
                FileTextEdits {
                    file_path: a.clone(),
                    text_edits: vec![edit(0, 2, "z")],
                },
            ],
        ])
        .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].file_path, a);
        assert_eq!(merged[0].text_edits, vec![edit(5, 7, "x"), edit(0, 2, "z")]);
        assert_eq!(merged[1].file_path, b);
    }

    #[test]
    fn test_merge_file_edits_rejects_conflicts_across_plans() {
        let a = PathBuf::from("/p/a.ts");
        let result = merge_file_edits(vec![
            vec![FileTextEdits {
                file_path: a.clone(),
                text_edits: vec![edit(0, 5, "x")],
            }],
            vec![FileTextEdits {
                file_path: a,
                text_edits: vec![edit(3, 8, "y")],
            }],
        ]);

        assert!(result.is_err());
    }
}
