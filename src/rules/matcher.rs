use crate::config::types::{MergedConfig, RuleParameters, RuleWithSource, Scope, SubstitutionSpec};
use crate::error::Result;
use crate::rules::editor::{
	InsertPosition, Substitution, delete_lines, insert_lines, substitute, substitute_batch,
};
use std::path::PathBuf;

/// The block a rule is being considered for.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
	/// Tag of the block class being processed.
	pub block_tag: &'a str,

	/// Entity name parsed from the block header.
	pub entity: &'a str,
}

/// The edit a compiled rule performs.
#[derive(Debug)]
pub enum RuleAction {
	Substitute(Substitution),
	SubstituteBatch(Vec<Substitution>),
	Insert {
		target: String,
		new_lines: Vec<String>,
		position: InsertPosition,
	},
	Delete {
		target: String,
	},
	/// Unrecognized kind; kept so rule numbering stays stable.
	Noop {
		kind: String,
	},
}

/// A rule with its patterns compiled, ready to dispatch.
#[derive(Debug)]
pub struct CompiledRule {
	pub active: bool,

	/// Block-class tags the rule applies to.
	pub blocks: Vec<String>,

	/// Entity the rule is limited to; `None` when the rule names "all".
	pub scope: Option<String>,

	pub action: RuleAction,

	/// Source rule file (for debugging).
	pub source: PathBuf,

	/// Position within the source file, starting at 1.
	pub index: usize,
}

impl CompiledRule {
	/// Compile a rule from a RuleWithSource.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Self> {
		let rule = &rws.rule;
		let checked = rule.check(rws.index)?;

		let action = match checked.parameters {
			RuleParameters::ReplaceText { from, to } => {
				let substitution = if rule.regex {
					Substitution::pattern(from, to.to_string())?
				} else {
					Substitution::literal(from.to_string(), to.to_string())
				};
				RuleAction::Substitute(substitution)
			}
			RuleParameters::ReplaceBatch(entries) => RuleAction::SubstituteBatch(
				entries
					.iter()
					.map(compile_substitution)
					.collect::<Result<_>>()?,
			),
			RuleParameters::InsertLine {
				target,
				position,
				new_lines,
			} => RuleAction::Insert {
				target: target.to_string(),
				new_lines: new_lines.to_vec(),
				position,
			},
			RuleParameters::DeleteLine { target } => RuleAction::Delete {
				target: target.to_string(),
			},
			RuleParameters::Unrecognized => {
				let kind = rule.kind.clone().unwrap_or_default();
				tracing::warn!(
					source = %rws.source.display(),
					index = rws.index,
					kind = %kind,
					"rule has unrecognized type and will be ignored"
				);
				RuleAction::Noop { kind }
			}
		};

		let scope = match checked.scope {
			Scope::All => None,
			Scope::Entity(entity) => Some(entity.to_string()),
		};

		Ok(CompiledRule {
			active: rule.active,
			blocks: rule.blocks.clone(),
			scope,
			action,
			source: rws.source.clone(),
			index: rws.index,
		})
	}

	/// Check if this rule applies to the given block.
	pub fn matches(&self, ctx: &BlockContext) -> bool {
		if !self.active {
			return false;
		}

		if !self.blocks.iter().any(|tag| tag == ctx.block_tag) {
			return false;
		}

		match self.scope {
			Some(ref entity) => entity == ctx.entity,
			None => true,
		}
	}

	/// Run this rule's edit over `body`, ignoring applicability.
	pub fn apply(&self, body: &str) -> String {
		match &self.action {
			RuleAction::Substitute(sub) => substitute(body, sub),
			RuleAction::SubstituteBatch(subs) => substitute_batch(body, subs),
			RuleAction::Insert {
				target,
				new_lines,
				position,
			} => insert_lines(body, target, new_lines, *position),
			RuleAction::Delete { target } => delete_lines(body, target),
			RuleAction::Noop { .. } => body.to_string(),
		}
	}
}

fn compile_substitution(entry: &SubstitutionSpec) -> Result<Substitution> {
	match entry {
		SubstitutionSpec::Pair { from, to } => Substitution::pattern(from, to.clone()),
		SubstitutionSpec::Sed(expression) => Substitution::parse(expression),
	}
}

/// Compile all rules in a merged config.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(CompiledRule::from_rule_with_source)
		.collect()
}

/// Apply every matching rule to `body`, in order.
///
/// Each rule sees the output of the previous one.
pub fn apply_rules(rules: &[CompiledRule], ctx: &BlockContext, body: &str) -> String {
	rules
		.iter()
		.filter(|rule| rule.matches(ctx))
		.fold(body.to_string(), |current, rule| {
			let next = rule.apply(&current);
			if next != current {
				tracing::debug!(
					block = ctx.block_tag,
					entity = ctx.entity,
					source = %rule.source.display(),
					index = rule.index,
					"rule changed block body"
				);
			}
			next
		})
}
