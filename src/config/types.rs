use crate::error::{CfgmorphError, Result};
use crate::rules::editor::InsertPosition;
use crate::segment::{BlockClass, BlockClasses};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.cfgmorph.toml` (or legacy JSON) rule file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade and jump directly to ~/.cfgmorph.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.cfgmorph.toml lookup.
	#[serde(default)]
	pub user_config_disable_env_var: Option<String>,

	/// Overrides for the two block classes' tags and header keywords.
	#[serde(default)]
	pub block_classes: BlockClassOverrides,

	/// Edit rules, applied in file order.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// Optional per-file replacements for the default block classes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockClassOverrides {
	pub primary: Option<BlockClass>,
	pub secondary: Option<BlockClass>,
}

/// A single edit rule as written in the rule file.
///
/// Everything is optional here; [`Rule::check`] verifies the scope and the
/// parameters the kind needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Inactive rules are never applied.
	#[serde(default)]
	pub active: bool,

	/// Block-class tags this rule applies to.
	#[serde(default)]
	pub blocks: Vec<String>,

	/// Entity name the rule is limited to, or "all". Required.
	#[serde(default, alias = "scope")]
	pub interface: Option<String>,

	/// Rule kind: replace-text, replace-batch, insert-line or delete-line.
	#[serde(rename = "type", default)]
	pub kind: Option<String>,

	/// Text (or pattern, with `regex = true`) to replace.
	pub from: Option<String>,

	/// Replacement text. Supports `$1` backreferences in regex mode.
	pub to: Option<String>,

	/// Interpret `from`/`to` as a regex search/replace.
	#[serde(default)]
	pub regex: bool,

	/// Ordered substitutions for replace-batch.
	#[serde(alias = "replace_batch")]
	pub replace_multiple: Option<Vec<SubstitutionSpec>>,

	/// Substring identifying the anchor line (insert) or doomed lines (delete).
	pub target: Option<String>,

	/// Where to insert: before, after or after-last.
	pub position: Option<String>,

	/// Lines to insert.
	pub new_lines: Option<Vec<String>>,
}

/// One entry of a replace-batch list: a table or a sed-style string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SubstitutionSpec {
	Pair { from: String, to: String },
	Sed(String),
}

/// Normalized rule kind name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
	ReplaceText,
	ReplaceBatch,
	InsertLine,
	DeleteLine,
	Unrecognized,
}

impl RuleType {
	/// Parse a kind name. Dashes and underscores are interchangeable.
	pub fn parse(name: &str) -> Self {
		match name.trim().replace('_', "-").as_str() {
			"replace-text" => RuleType::ReplaceText,
			"replace-batch" | "replace-multiple" => RuleType::ReplaceBatch,
			"insert-line" => RuleType::InsertLine,
			"delete-line" => RuleType::DeleteLine,
			_ => RuleType::Unrecognized,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			RuleType::ReplaceText => "replace-text",
			RuleType::ReplaceBatch => "replace-batch",
			RuleType::InsertLine => "insert-line",
			RuleType::DeleteLine => "delete-line",
			RuleType::Unrecognized => "unrecognized",
		}
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from one or more rule files.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All rules in application order.
	pub rules: Vec<RuleWithSource>,

	/// Effective block classes.
	pub block_classes: BlockClasses,
}

/// A rule with its source file and 1-based position for display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: Rule,

	/// The rule file this rule came from.
	pub source: PathBuf,

	/// Position of the rule within its file, starting at 1.
	pub index: usize,
}

/// Which entities a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
	All,
	Entity(&'a str),
}

impl<'a> Scope<'a> {
	fn parse(name: &'a str) -> Self {
		match name {
			"all" => Scope::All,
			name => Scope::Entity(name),
		}
	}
}

/// The parameters a rule's kind needs, borrowed from the rule once checked.
#[derive(Debug, Clone, Copy)]
pub enum RuleParameters<'a> {
	ReplaceText {
		from: &'a str,
		to: &'a str,
	},
	ReplaceBatch(&'a [SubstitutionSpec]),
	InsertLine {
		target: &'a str,
		position: InsertPosition,
		new_lines: &'a [String],
	},
	DeleteLine {
		target: &'a str,
	},
	Unrecognized,
}

/// A rule whose scope and kind parameters are known to be present.
#[derive(Debug, Clone, Copy)]
pub struct CheckedRule<'a> {
	pub scope: Scope<'a>,
	pub parameters: RuleParameters<'a>,
}

impl Rule {
	/// The normalized kind of this rule.
	pub fn rule_type(&self) -> RuleType {
		self.kind
			.as_deref()
			.map(RuleType::parse)
			.unwrap_or(RuleType::Unrecognized)
	}

	/// Check the rule's parameters and borrow them in typed form.
	///
	/// Every rule must name its scope: an entity or "all". Unrecognized kinds
	/// need nothing else, they are no-ops.
	pub fn check(&self, index: usize) -> Result<CheckedRule<'_>> {
		let kind = self.rule_type();
		let missing = |parameter: &str| CfgmorphError::MissingParameter {
			index,
			kind: kind.as_str().to_string(),
			parameter: parameter.to_string(),
		};

		let parameters = match kind {
			RuleType::ReplaceText => RuleParameters::ReplaceText {
				from: self.from.as_deref().ok_or_else(|| missing("from"))?,
				to: self.to.as_deref().ok_or_else(|| missing("to"))?,
			},
			RuleType::ReplaceBatch => RuleParameters::ReplaceBatch(
				self.replace_multiple
					.as_deref()
					.ok_or_else(|| missing("replace_multiple"))?,
			),
			RuleType::InsertLine => {
				let target = non_empty(self.target.as_deref()).ok_or_else(|| missing("target"))?;
				let position = self.position.as_deref().ok_or_else(|| missing("position"))?;
				let position = InsertPosition::parse(position).ok_or_else(|| {
					CfgmorphError::InvalidPosition {
						index,
						position: position.to_string(),
					}
				})?;
				let new_lines = self
					.new_lines
					.as_deref()
					.ok_or_else(|| missing("new_lines"))?;
				RuleParameters::InsertLine {
					target,
					position,
					new_lines,
				}
			}
			RuleType::DeleteLine => RuleParameters::DeleteLine {
				target: non_empty(self.target.as_deref()).ok_or_else(|| missing("target"))?,
			},
			RuleType::Unrecognized => RuleParameters::Unrecognized,
		};

		let scope = self
			.interface
			.as_deref()
			.map(Scope::parse)
			.ok_or_else(|| missing("interface"))?;

		Ok(CheckedRule { scope, parameters })
	}

	/// Validate that the rule names a scope and the parameters its kind needs.
	pub fn validate(&self, index: usize) -> Result<()> {
		self.check(index).map(|_| ())
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

impl Config {
	/// Validate all rules in this config.
	pub fn validate(&self) -> Result<()> {
		for (i, rule) in self.rules.iter().enumerate() {
			rule.validate(i + 1)?;
		}
		Ok(())
	}
}
