//! Line editors: pure text transformations over a block body.

use crate::error::{CfgmorphError, Result};
use regex::Regex;

/// Where `insert_lines` places new lines relative to the matching lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
	/// Before the first matching line.
	Before,
	/// After the first matching line.
	After,
	/// After the last matching line.
	AfterLast,
}

impl InsertPosition {
	/// Parse a position name. Dashes and underscores are interchangeable.
	pub fn parse(name: &str) -> Option<Self> {
		match name.trim().replace('_', "-").as_str() {
			"before" => Some(InsertPosition::Before),
			"after" => Some(InsertPosition::After),
			"after-last" => Some(InsertPosition::AfterLast),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			InsertPosition::Before => "before",
			InsertPosition::After => "after",
			InsertPosition::AfterLast => "after-last",
		}
	}
}

/// A text substitution, either literal or regex based.
#[derive(Debug)]
pub enum Substitution {
	/// Replace every occurrence of `from` verbatim.
	Literal { from: String, to: String },

	/// Regex search/replace; `replacement` may use `$1` / `${name}`.
	Pattern {
		pattern: Regex,
		replacement: String,
		global: bool,
	},
}

impl Substitution {
	pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
		Substitution::Literal {
			from: from.into(),
			to: to.into(),
		}
	}

	/// Compile a regex substitution that replaces all matches.
	pub fn pattern(from: &str, to: impl Into<String>) -> Result<Self> {
		Ok(Substitution::Pattern {
			pattern: compile_regex(from)?,
			replacement: to.into(),
			global: true,
		})
	}

	/// Parse a substitution in sed-like format: "s/pattern/replacement/" or "s/pattern/replacement/g"
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| CfgmorphError::InvalidSubstitution {
			expression: input.to_string(),
			reason: reason.to_string(),
		};

		let rest = input
			.strip_prefix('s')
			.ok_or_else(|| invalid("must start with 's'"))?;

		// The character after 's' is the delimiter
		let delimiter = rest.chars().next().ok_or_else(|| invalid("too short"))?;
		let parts = split_by_delimiter(&rest[delimiter.len_utf8()..], delimiter);

		if parts.len() < 2 {
			return Err(invalid("must have pattern and replacement"));
		}

		let flags = parts.get(2).map(String::as_str).unwrap_or("");

		Ok(Substitution::Pattern {
			pattern: compile_regex(&parts[0])?,
			replacement: parts[1].clone(),
			global: flags.contains('g'),
		})
	}

	/// Apply this substitution to a string.
	pub fn apply(&self, input: &str) -> String {
		match self {
			// An empty needle would match between every character
			Substitution::Literal { from, .. } if from.is_empty() => input.to_string(),
			Substitution::Literal { from, to } => input.replace(from.as_str(), to),
			Substitution::Pattern {
				pattern,
				replacement,
				global: true,
			} => pattern.replace_all(input, replacement.as_str()).into_owned(),
			Substitution::Pattern {
				pattern,
				replacement,
				global: false,
			} => pattern.replace(input, replacement.as_str()).into_owned(),
		}
	}
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| CfgmorphError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Split a string by a delimiter, respecting backslash escapes.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '\\' && chars.peek() == Some(&delimiter) {
			current.push(delimiter);
			chars.next();
		} else if c == delimiter {
			parts.push(std::mem::take(&mut current));
		} else {
			current.push(c);
		}
	}

	parts.push(current);
	parts
}

/// Apply one substitution to `body`.
pub fn substitute(body: &str, substitution: &Substitution) -> String {
	substitution.apply(body)
}

/// Apply substitutions in order; each one sees the previous one's output.
pub fn substitute_batch(body: &str, substitutions: &[Substitution]) -> String {
	substitutions
		.iter()
		.fold(body.to_string(), |acc, sub| sub.apply(&acc))
}

/// Insert `new_lines` next to the line(s) containing `target`.
///
/// New lines whose trimmed text already occurs in some body line are
/// skipped, so applying the same insertion twice changes nothing the second
/// time. Returns the body unchanged when no line contains `target` or
/// nothing is left to insert.
pub fn insert_lines(
	body: &str,
	target: &str,
	new_lines: &[String],
	position: InsertPosition,
) -> String {
	let lines: Vec<&str> = body.split_inclusive('\n').collect();

	let anchor = match position {
		InsertPosition::AfterLast => lines.iter().rposition(|l| l.contains(target)),
		InsertPosition::Before | InsertPosition::After => {
			lines.iter().position(|l| l.contains(target))
		}
	};
	let Some(anchor) = anchor else {
		return body.to_string();
	};

	let pending: Vec<&str> = new_lines
		.iter()
		.map(|l| l.trim_end_matches(['\r', '\n']))
		.filter(|l| {
			let needle = l.trim();
			!lines.iter().any(|existing| existing.trim().contains(needle))
		})
		.collect();
	if pending.is_empty() {
		return body.to_string();
	}

	let eol = if lines[anchor].ends_with("\r\n") {
		"\r\n"
	} else {
		"\n"
	};
	let insert_at = match position {
		InsertPosition::Before => anchor,
		InsertPosition::After | InsertPosition::AfterLast => anchor + 1,
	};
	let push_pending = |out: &mut String| {
		for line in &pending {
			out.push_str(line);
			out.push_str(eol);
		}
	};

	let mut out = String::with_capacity(body.len() + pending.iter().map(|l| l.len() + 2).sum::<usize>());
	for (i, line) in lines.iter().enumerate() {
		if i == insert_at {
			push_pending(&mut out);
		}
		out.push_str(line);
		if i == anchor && insert_at > anchor && !line.ends_with('\n') {
			out.push_str(eol);
		}
	}
	if insert_at == lines.len() {
		push_pending(&mut out);
	}

	out
}

/// Remove every line containing `target`, keeping the rest verbatim.
pub fn delete_lines(body: &str, target: &str) -> String {
	if target.is_empty() {
		return body.to_string();
	}
	body.split_inclusive('\n')
		.filter(|line| !line.contains(target))
		.collect()
}
