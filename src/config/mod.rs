//! Rule file loading and parsing for cfgmorph.
//!
//! This module handles:
//! - TOML (and legacy JSON) rule file parsing and validation
//! - Directory cascade discovery
//! - Config merging
//! - The `--init` starter template

pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_merged_config, load_rules_file, merge_configs,
	user_config_path,
};
pub use parser::{parse_config_file, parse_config_json_str, parse_config_str};
pub use template::generate_init_template;
pub use types::{
	BlockClassOverrides, CheckedRule, Config, LoadedConfig, MergedConfig, Rule, RuleParameters,
	RuleType, RuleWithSource, Scope, SubstitutionSpec,
};
