//! The two-pass rewrite pipeline.
//!
//! The document is segmented by the primary block class and every block body
//! is run through the rules; the reassembled text is then segmented by the
//! secondary class and rewritten again. The second pass sees the first
//! pass's output, so edits can create or remove secondary headers.

pub mod io;

use crate::rules::{BlockContext, CompiledRule, apply_rules};
use crate::segment::{BlockClass, BlockClasses, Segment, segment};

/// What one pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
	/// Tag of the block class the pass segmented by.
	pub tag: String,

	/// Number of blocks found.
	pub blocks: usize,

	/// Number of blocks whose body was modified.
	pub changed: usize,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct Rewrite {
	/// The rewritten document.
	pub text: String,

	/// One summary per pass, in pass order.
	pub passes: Vec<PassSummary>,
}

/// Rewrite every block of `class` in `text`.
///
/// Verbatim text and headers are copied through unchanged.
pub fn rewrite_pass(
	text: &str,
	class: &BlockClass,
	rules: &[CompiledRule],
) -> (String, PassSummary) {
	let mut out = String::with_capacity(text.len());
	let mut summary = PassSummary {
		tag: class.tag.clone(),
		blocks: 0,
		changed: 0,
	};

	for piece in segment(text, class) {
		match piece {
			Segment::Verbatim(verbatim) => out.push_str(verbatim),
			Segment::Block(block) => {
				let ctx = BlockContext {
					block_tag: &class.tag,
					entity: block.entity,
				};
				let body = apply_rules(rules, &ctx, block.body);

				summary.blocks += 1;
				if body != block.body {
					summary.changed += 1;
				}

				out.push_str(block.header);
				out.push_str(&body);
			}
		}
	}

	tracing::info!(
		block = %summary.tag,
		keyword = %class.keyword,
		blocks = summary.blocks,
		changed = summary.changed,
		"pass complete"
	);

	(out, summary)
}

/// Run the primary pass, then the secondary pass over its output.
pub fn run(document: &str, rules: &[CompiledRule], classes: &BlockClasses) -> Rewrite {
	let (after_primary, primary) = rewrite_pass(document, &classes.primary, rules);
	let (text, secondary) = rewrite_pass(&after_primary, &classes.secondary, rules);

	Rewrite {
		text,
		passes: vec![primary, secondary],
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{MergedConfig, RuleWithSource, parse_config_str};
	use crate::rules::compile_rules;
	use std::path::PathBuf;

	const DUMP: &str = "\
hostname OLT-1
interface gpon-olt_1/2/1
  shutdown
  onu 1 type ZTE-F660 sn ZTEG0001
interface gpon-olt_1/2/2
  shutdown
pon-onu-mng gpon-onu_1/2/1:1
  service 1 gemport 1 vlan 100
  service 2 gemport 2 vlan 200
pon-onu-mng gpon-onu_1/2/1:2
  service 1 gemport 1 vlan 100
end
";

	fn rules(content: &str) -> Vec<CompiledRule> {
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();
		let merged = MergedConfig {
			rules: config
				.rules
				.into_iter()
				.enumerate()
				.map(|(i, rule)| RuleWithSource {
					rule,
					source: path.clone(),
					index: i + 1,
				})
				.collect(),
			..Default::default()
		};
		compile_rules(&merged).unwrap()
	}

	#[test]
	fn test_no_rules_leaves_document_untouched() {
		let rewrite = run(DUMP, &[], &BlockClasses::default());
		assert_eq!(rewrite.text, DUMP);
		assert_eq!(rewrite.passes[0].blocks, 2);
		assert_eq!(rewrite.passes[1].blocks, 2);
		assert_eq!(rewrite.passes[0].changed, 0);
	}

	#[test]
	fn test_scoped_rule_only_touches_its_entity() {
		let rules = rules(
			r#"
[[rules]]
active = true
blocks = ["Sec.1"]
interface = "gpon-olt_1/2/2"
type = "replace-text"
from = "shutdown"
to = "no shutdown"
"#,
		);
		let rewrite = run(DUMP, &rules, &BlockClasses::default());

		assert!(rewrite.text.contains("interface gpon-olt_1/2/1\n  shutdown\n"));
		assert!(rewrite.text.contains("interface gpon-olt_1/2/2\n  no shutdown\n"));
		assert_eq!(rewrite.passes[0].changed, 1);
	}

	#[test]
	fn test_secondary_insert_after_last() {
		let rules = rules(
			r#"
[[rules]]
active = true
blocks = ["Sec.2"]
interface = "gpon-onu_1/2/1:1"
type = "insert-line"
target = "service"
position = "after-last"
new_lines = ["  mvlan 100"]
"#,
		);
		let rewrite = run(DUMP, &rules, &BlockClasses::default());

		assert!(rewrite.text.contains(
			"  service 2 gemport 2 vlan 200\n  mvlan 100\npon-onu-mng gpon-onu_1/2/1:2\n"
		));
		assert_eq!(rewrite.text.matches("mvlan 100").count(), 1);

		// Running again adds nothing
		let again = run(&rewrite.text, &rules, &BlockClasses::default());
		assert_eq!(again.text, rewrite.text);
		assert_eq!(again.passes[1].changed, 0);
	}

	#[test]
	fn test_secondary_pass_sees_primary_output() {
		// The primary pass turns a plain line into a secondary header
		let rules = rules(
			r#"
[[rules]]
active = true
blocks = ["Sec.1"]
interface = "gpon-olt_1/2/1"
type = "replace-text"
from = "onu 1 type ZTE-F660 sn ZTEG0001"
to = "onu 1 type ZTE-F660 sn ZTEG0001\npon-onu-mng gpon-onu_1/2/1:9\n  flag"

[[rules]]
active = true
blocks = ["Sec.2"]
interface = "gpon-onu_1/2/1:9"
type = "replace-text"
from = "flag"
to = "seen"
"#,
		);
		let rewrite = run(DUMP, &rules, &BlockClasses::default());

		assert!(rewrite.text.contains("pon-onu-mng gpon-onu_1/2/1:9\n  seen\n"));
		assert_eq!(rewrite.passes[1].blocks, 3);
	}

	#[test]
	fn test_rule_for_both_classes() {
		let rules = rules(
			r#"
[[rules]]
active = true
blocks = ["Sec.1", "Sec.2"]
interface = "all"
type = "delete-line"
target = "vlan 200"
"#,
		);
		let rewrite = run(DUMP, &rules, &BlockClasses::default());

		// The interface pass already removed it, the managed-object pass finds nothing
		assert!(!rewrite.text.contains("vlan 200"));
		assert_eq!(rewrite.passes[0].changed, 1);
		assert_eq!(rewrite.passes[1].changed, 0);
	}

	#[test]
	fn test_leading_text_preserved() {
		let rules = rules(
			r#"
[[rules]]
active = true
blocks = ["Sec.1"]
interface = "all"
type = "replace-text"
from = "OLT"
to = "XXX"
"#,
		);
		let rewrite = run(DUMP, &rules, &BlockClasses::default());
		assert!(rewrite.text.starts_with("hostname OLT-1\n"));
	}

	#[test]
	fn test_custom_block_classes() {
		let classes = BlockClasses {
			primary: BlockClass::new("IF", "interface"),
			secondary: BlockClass::new("ONU", "pon-onu-mng"),
		};
		let rules = rules(
			r#"
[[rules]]
active = true
blocks = ["ONU"]
interface = "all"
type = "replace-text"
from = "vlan 100"
to = "vlan 101"
"#,
		);
		let rewrite = run(DUMP, &rules, &classes);
		assert_eq!(rewrite.text.matches("vlan 101").count(), 2);
		assert_eq!(rewrite.passes[1].tag, "ONU");
	}
}
