use std::path::PathBuf;

/// Library-level structured errors for cfgmorph.
///
/// Every variant is a load-time failure: once rules are compiled and the
/// input is decoded, rewriting itself cannot fail. The CLI binary wraps
/// these with `anyhow` for context chains.
#[derive(Debug, thiserror::Error)]
pub enum CfgmorphError {
	#[error("Rule file not found: {path}")]
	RulesNotFound { path: PathBuf },

	#[error("Failed to read rule file: {path}")]
	RulesReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse rule file: {path}")]
	RulesParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to parse JSON rule file: {path}")]
	RulesJsonParseError {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution expression: {expression} ({reason})")]
	InvalidSubstitution { expression: String, reason: String },

	#[error("Rule {index} ({kind}) is missing required parameter `{parameter}`")]
	MissingParameter {
		index: usize,
		kind: String,
		parameter: String,
	},

	#[error("Rule {index} has invalid insert position: {position}")]
	InvalidPosition { index: usize, position: String },

	#[error("Failed to read input: {path}")]
	InputReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write output: {path}")]
	OutputWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using CfgmorphError.
pub type Result<T> = std::result::Result<T, CfgmorphError>;
