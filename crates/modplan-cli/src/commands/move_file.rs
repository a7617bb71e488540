use super::print_move_plan;
use crate::OutputFormat;
use anyhow::Result;
use modplan_core::{plan_file_move_in, AnalysisSession, FileMoveRequest};
use std::path::PathBuf;

pub fn run(
    session: &AnalysisSession,
    old_path: PathBuf,
    new_path: PathBuf,
    format: OutputFormat,
) -> Result<()> {
    let plan = plan_file_move_in(session, &FileMoveRequest::new(old_path, new_path))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Human => print_move_plan(session.project_root(), &plan),
    }

    Ok(())
}
