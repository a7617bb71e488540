use super::print_move_plan;
use crate::OutputFormat;
use anyhow::Result;
use modplan_core::{plan_directory_move_in, AnalysisSession, DirectoryMoveRequest};
use std::path::PathBuf;

pub fn run(
    session: &AnalysisSession,
    old_dir: PathBuf,
    new_dir: PathBuf,
    format: OutputFormat,
) -> Result<()> {
    let plan = plan_directory_move_in(session, &DirectoryMoveRequest::new(old_dir, new_dir))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Human => print_move_plan(session.project_root(), &plan),
    }

    Ok(())
}
