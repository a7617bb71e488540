use crate::Result;
use modplan_analysis::paths::{normalize_path, resolve_against};
use modplan_analysis::{LexicalAnalysis, SourceAnalysis};
use modplan_config::PlanConfig;
use std::path::{Path, PathBuf};

/// A project root paired with the analysis that answers questions about it.
///
/// A session serves one planning call at a time; open a new one per
/// concurrent caller.
pub struct AnalysisSession {
    project_root: PathBuf,
    analysis: Box<dyn SourceAnalysis + Send>,
}

impl AnalysisSession {
    /// Open a session using the configuration found at or above `project_root`
    pub fn open(project_root: impl AsRef<Path>) -> Result<Self> {
        let project_root = absolute_root(project_root.as_ref())?;
        let (config, config_path) = modplan_config::load_project_config(&project_root)?;

        match &config_path {
            Some(path) => tracing::info!(config = %path.display(), "Loaded project config"),
            None => tracing::debug!(
                root = %project_root.display(),
                "No config file found, using defaults"
            ),
        }

        Self::with_config(project_root, &config)
    }

    /// Open a session with an explicit configuration
    pub fn with_config(project_root: impl AsRef<Path>, config: &PlanConfig) -> Result<Self> {
        let project_root = absolute_root(project_root.as_ref())?;
        let analysis = LexicalAnalysis::new(&project_root, config)?;

        Ok(Self {
            project_root,
            analysis: Box::new(analysis),
        })
    }

    /// Wrap an existing analysis
    pub fn new(
        project_root: impl AsRef<Path>,
        analysis: impl SourceAnalysis + Send + 'static,
    ) -> Result<Self> {
        Ok(Self {
            project_root: absolute_root(project_root.as_ref())?,
            analysis: Box::new(analysis),
        })
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    #[must_use]
    pub fn analysis(&self) -> &dyn SourceAnalysis {
        self.analysis.as_ref()
    }

    /// Make `path` absolute against the project root
    #[must_use]
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve_against(&self.project_root, path.as_ref())
    }
}

impl std::fmt::Debug for AnalysisSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("project_root", &self.project_root)
            .finish_non_exhaustive()
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf> {
    if root.is_absolute() {
        Ok(normalize_path(root))
    } else {
        Ok(resolve_against(&std::env::current_dir()?, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_path() {
        let temp = TempDir::new().unwrap();
        let session = AnalysisSession::with_config(temp.path(), &PlanConfig::default()).unwrap();

        assert_eq!(
            session.resolve_path("src/../lib/a.ts"),
            temp.path().join("lib/a.ts")
        );
        assert_eq!(session.resolve_path("/abs/b.ts"), PathBuf::from("/abs/b.ts"));
    }

    #[test]
    fn test_open_reads_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".modplanrc.yml"), "sources: 'src/**/*.ts'\n").unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/a.ts"), "").unwrap();
        fs::write(temp.path().join("b.ts"), "").unwrap();

        let session = AnalysisSession::open(temp.path()).unwrap();
        let files = session.analysis().list_project_files().unwrap();

        assert_eq!(files, vec![temp.path().join("src/a.ts")]);
    }

    #[test]
    fn test_open_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        assert!(AnalysisSession::open(temp.path().join("missing")).is_err());
    }
}
