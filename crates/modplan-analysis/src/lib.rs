mod capability;
mod error;
mod language;
mod lexical;
pub mod paths;
mod project_files;
pub mod specifiers;
mod span;
mod syntax;

pub use capability::{RelocationSet, Renameability, SourceAnalysis};
pub use error::{AnalysisError, Result};
pub use language::Language;
pub use lexical::LexicalAnalysis;
pub use project_files::{discover_project_files, SourceFilter};
pub use span::{OffsetSpan, RawChange, ReferenceSpan};
