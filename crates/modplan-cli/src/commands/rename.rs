use super::print_file_edits;
use crate::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use modplan_core::{plan_rename_in, AnalysisSession, Position, RenameOptions, RenameRequest};
use std::path::PathBuf;
use std::process;

pub struct Options {
    pub file: PathBuf,
    pub line: usize,
    pub character: usize,
    pub new_name: String,
    pub strings: bool,
    pub comments: bool,
}

pub fn run(session: &AnalysisSession, options: Options, format: OutputFormat) -> Result<()> {
    let request = RenameRequest::new(
        options.file,
        Position::new(options.line, options.character),
        options.new_name,
    )
    .with_options(RenameOptions {
        find_in_strings: options.strings,
        find_in_comments: options.comments,
    });

    let plan = plan_rename_in(session, &request)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Human => {
            if let Some(edits) = plan.edits() {
                let count: usize = edits.iter().map(|file| file.text_edits.len()).sum();
                println!(
                    "{}",
                    format!(
                        "✓ Rename to '{}': {count} edit(s) in {} file(s)",
                        request.new_name,
                        edits.len()
                    )
                    .green()
                );
                print_file_edits(session.project_root(), edits);
            }
        }
    }

    if let Some(reason) = plan.reason() {
        if matches!(format, OutputFormat::Human) {
            eprintln!("{} {}", "✗ Cannot rename:".red(), reason);
        }
        process::exit(1);
    }

    Ok(())
}
