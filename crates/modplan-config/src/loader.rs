use crate::{ConfigError, PlanConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &[
    ".modplanrc.yml",
    ".modplanrc.yaml",
    ".modplanrc.json",
    ".modplanrc",
    "modplan.config.yml",
    "modplan.config.yaml",
    "modplan.config.json",
];

/// Find a config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();

    loop {
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                return Ok(Some(config_path));
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Ok(None)
}

/// Load the configuration that applies to a project root.
///
/// Returns the default configuration when no config file exists anywhere above
/// `project_root`, together with the path of the file that was used.
pub fn load_project_config(project_root: &Path) -> Result<(PlanConfig, Option<PathBuf>)> {
    match find_config(project_root)? {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => Ok((PlanConfig::default(), None)),
    }
}

/// Load a config from the specified path.
/// Automatically detects the format based on file extension.
pub fn load_config(path: &Path) -> Result<PlanConfig> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents, path)
}

/// Load a config from a string.
/// The path is used for error messages and format detection.
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<PlanConfig> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        // .modplanrc without extension - try YAML first, then JSON
        "" if file_name == ".modplanrc" => {
            parse_yaml(contents, path).or_else(|_| parse_json(contents, path))?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;

    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<PlanConfig> {
    // An empty YAML document is a valid, all-defaults config
    if contents.trim().is_empty() {
        return Ok(PlanConfig::default());
    }

    serde_yaml::from_str(contents).map_err(|source| ConfigError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<PlanConfig> {
    serde_json::from_str(contents).map_err(|source| ConfigError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_config(config: &PlanConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    if let Some(ref sources) = config.sources {
        let patterns = sources.patterns();
        if patterns.is_empty() {
            return Err(invalid("'sources' must list at least one pattern".to_string()));
        }
        if patterns.iter().any(|pattern| pattern.trim().is_empty()) {
            return Err(invalid("'sources' contains an empty pattern".to_string()));
        }
    }

    if let Some(ref exclude) = config.exclude {
        if exclude.iter().any(|pattern| pattern.trim().is_empty()) {
            return Err(invalid("'exclude' contains an empty pattern".to_string()));
        }
    }

    if let Some(ref extensions) = config.resolve_extensions {
        for extension in extensions {
            if !extension.starts_with('.') || extension.len() < 2 {
                return Err(invalid(format!(
                    "resolve extension '{extension}' must start with '.'"
                )));
            }
        }
    }

    Ok(())
}
