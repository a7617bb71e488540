use crate::aggregate::check_overlaps;
use crate::{FileTextEdits, LineIndex, PlanError, Result, TextEdit};

impl FileTextEdits {
    /// Preview the result of applying these edits to `text`.
    ///
    /// Exact duplicates apply once. Insertions at the same position apply in
    /// emission order. Any other pair of edits touching the same text is an
    /// error.
    pub fn apply_to(&self, text: &str) -> Result<String> {
        check_overlaps(&self.file_path, &self.text_edits)?;

        let index = LineIndex::new(text);
        let mut resolved: Vec<(usize, usize, &TextEdit)> = Vec::with_capacity(self.text_edits.len());
        for edit in &self.text_edits {
            let start = index.position_to_offset(edit.range.start)?;
            let end = index.position_to_offset(edit.range.end)?;
            resolved.push((start, end, edit));
        }

        // stable, so coinciding edits keep emission order
        resolved.sort_by_key(|(start, end, _)| (*start, *end));

        let mut merged: Vec<(usize, usize, String)> = Vec::with_capacity(resolved.len());
        for (start, end, edit) in resolved {
            match merged.last_mut() {
                Some(last) if last.0 == start && last.1 == end => {
                    if start == end {
                        last.2.push_str(&edit.new_text);
                    } else if last.2 != edit.new_text {
                        return Err(PlanError::OverlappingEdits {
                            file: self.file_path.clone(),
                            first: edit.range,
                            second: edit.range,
                        });
                    }
                }
                _ => merged.push((start, end, edit.new_text.clone())),
            }
        }

        let units: Vec<u16> = text.encode_utf16().collect();
        let mut output: Vec<u16> = Vec::with_capacity(units.len());
        let mut cursor = 0;
        for (start, end, new_text) in merged {
            output.extend_from_slice(&units[cursor..start]);
            output.extend(new_text.encode_utf16());
            cursor = end;
        }
        output.extend_from_slice(&units[cursor..]);

        // offsets never split a surrogate pair, so this cannot lose data
        Ok(String::from_utf16_lossy(&output))
    }
}

#[cfg(test)]
mod tests {
    use crate::{FileTextEdits, PlanError, Position, Range, TextEdit};
    use std::path::PathBuf;

    fn edit(line: usize, start: usize, end: usize, text: &str) -> TextEdit {
        TextEdit::new(
            Range::new(Position::new(line, start), Position::new(line, end)),
            text,
        )
    }

    fn file_edits(text_edits: Vec<TextEdit>) -> FileTextEdits {
        FileTextEdits {
            file_path: PathBuf::from("/p/a.ts"),
            text_edits,
        }
    }

    #[test]
    fn test_apply_in_any_emission_order() {
        let text = "import { foo } from './a';\nfoo();\n";
        let edits = file_edits(vec![edit(1, 0, 3, "bar"), edit(0, 9, 12, "bar")]);

        assert_eq!(
            edits.apply_to(text).unwrap(),
            "import { bar } from './a';\nbar();\n"
        );
    }

    #[test]
    fn test_duplicate_edits_apply_once() {
        let edits = file_edits(vec![edit(0, 0, 3, "bar"), edit(0, 0, 3, "bar")]);
        assert_eq!(edits.apply_to("foo()").unwrap(), "bar()");
    }

    #[test]
    fn test_conflicting_replacements_are_rejected() {
        let edits = file_edits(vec![edit(0, 0, 3, "bar"), edit(0, 0, 3, "baz")]);
        assert!(matches!(
            edits.apply_to("foo()"),
            Err(PlanError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn test_insertions_at_same_point_keep_order() {
        let edits = file_edits(vec![edit(0, 1, 1, "x"), edit(0, 1, 1, "y")]);
        assert_eq!(edits.apply_to("ab").unwrap(), "axyb");
    }

    #[test]
    fn test_surrogate_pairs_are_preserved() {
        let text = "const s = '😀'; foo;";
        // foo starts after 16 code units
        let edits = file_edits(vec![edit(0, 16, 19, "bar")]);
        assert_eq!(edits.apply_to(text).unwrap(), "const s = '😀'; bar;");
    }

    #[test]
    fn test_position_outside_text_is_an_error() {
        let edits = file_edits(vec![edit(3, 0, 1, "x")]);
        assert!(matches!(
            edits.apply_to("one line"),
            Err(PlanError::Conversion(_))
        ));
    }
}
