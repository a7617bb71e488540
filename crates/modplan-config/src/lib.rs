mod config;
mod error;
mod loader;

pub use config::{
    PlanConfig, SourcesConfig, DEFAULT_EXCLUDE_PATTERNS, DEFAULT_RESOLVE_EXTENSIONS,
    DEFAULT_SOURCE_PATTERN,
};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str, load_project_config};
