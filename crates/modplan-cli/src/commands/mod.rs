pub mod move_dir;
pub mod move_file;
pub mod rename;

use colored::Colorize;
use modplan_core::{FileTextEdits, FsMove, MovePlan};
use std::path::Path;

/// `path` relative to the project root when it lies inside it
fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn print_file_edits(root: &Path, edits: &[FileTextEdits]) {
    for file_edits in edits {
        println!("{}", display_path(root, &file_edits.file_path).bold());
        for edit in &file_edits.text_edits {
            println!(
                "  {} {} {}",
                edit.range.to_string().dimmed(),
                "→".cyan(),
                edit.new_text.green()
            );
        }
    }
}

fn print_fs_moves(root: &Path, moves: &[FsMove]) {
    for fs_move in moves {
        println!(
            "  {} {} {}",
            display_path(root, &fs_move.from),
            "→".cyan(),
            display_path(root, &fs_move.to).green()
        );
    }
}

fn print_move_plan(root: &Path, plan: &MovePlan) {
    if plan.fs_moves.is_empty() {
        println!("{}", "No project files to move".yellow());
        return;
    }

    println!("{}", format!("{} file move(s):", plan.fs_moves.len()).bold());
    print_fs_moves(root, &plan.fs_moves);

    if plan.edits.is_empty() {
        println!("\n{}", "✓ No imports need updating".green());
    } else {
        println!(
            "\n{}",
            format!(
                "{} edit(s) in {} file(s):",
                plan.text_edit_count(),
                plan.edits.len()
            )
            .bold()
        );
        print_file_edits(root, &plan.edits);
    }
}
