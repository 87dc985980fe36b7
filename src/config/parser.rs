use crate::config::types::Config;
use crate::error::{CfgmorphError, Result};
use std::path::Path;

/// Parse a rule file from the given path.
///
/// Files with a `.json` extension are read as JSON, everything else as TOML.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			CfgmorphError::RulesNotFound {
				path: path.to_path_buf(),
			}
		} else {
			CfgmorphError::RulesReadError {
				path: path.to_path_buf(),
				source,
			}
		}
	})?;

	let is_json = path
		.extension()
		.is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

	if is_json {
		parse_config_json_str(&content, path)
	} else {
		parse_config_str(&content, path)
	}
}

/// Parse a TOML config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| CfgmorphError::RulesParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;

	Ok(config)
}

/// Parse a JSON config of the form `{ "rules": [...] }`.
pub fn parse_config_json_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		serde_json::from_str(content).map_err(|source| CfgmorphError::RulesJsonParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;

	Ok(config)
}
