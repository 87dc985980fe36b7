//! Rule compilation, dispatch and the line editors rules drive.
//!
//! This module handles:
//! - Compiling rule records into typed actions (regexes built up front)
//! - Deciding which rules apply to a block
//! - Literal/regex substitution, line insertion and line deletion

pub mod editor;
pub mod matcher;

pub use editor::{
	InsertPosition, Substitution, delete_lines, insert_lines, substitute, substitute_batch,
};
pub use matcher::{BlockContext, CompiledRule, RuleAction, apply_rules, compile_rules};
