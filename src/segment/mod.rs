//! Block segmentation of configuration dumps.
//!
//! A block class is identified by a header keyword. Each header line opens a
//! block whose body runs until the next header of the same class (or the end
//! of the document). Headers of other classes are ordinary body lines.

use serde::Deserialize;

/// Entity name used when a header carries no identifier after its keyword.
pub const UNKNOWN_ENTITY: &str = "unknown";

/// A family of boundary lines that delimit blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockClass {
	/// Tag rules use in their `blocks` list to select this class.
	pub tag: String,

	/// Keyword a header line starts with (after leading whitespace).
	pub keyword: String,
}

impl BlockClass {
	pub fn new(tag: impl Into<String>, keyword: impl Into<String>) -> Self {
		BlockClass {
			tag: tag.into(),
			keyword: keyword.into(),
		}
	}

	/// Whether `line` is a boundary line of this class.
	pub fn is_header(&self, line: &str) -> bool {
		!self.keyword.is_empty() && line.trim_start().starts_with(&self.keyword)
	}
}

/// The two block classes a pipeline run segments by, in pass order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockClasses {
	pub primary: BlockClass,
	pub secondary: BlockClass,
}

impl Default for BlockClasses {
	fn default() -> Self {
		BlockClasses {
			primary: BlockClass::new("Sec.1", "interface"),
			secondary: BlockClass::new("Sec.2", "pon-onu-mng"),
		}
	}
}

/// A header line and the body lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
	/// The boundary line, including its line terminator.
	pub header: &'a str,

	/// Identifier parsed from the header, or [`UNKNOWN_ENTITY`].
	pub entity: &'a str,

	/// Everything up to the next header of the same class.
	pub body: &'a str,
}

/// A piece of a segmented document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
	/// Text outside any block, passed through untouched.
	Verbatim(&'a str),
	Block(Block<'a>),
}

/// Parse the entity name out of a header line.
///
/// Returns the first whitespace-separated token after `keyword`, or `None`
/// when the line doesn't start with the keyword followed by whitespace.
pub fn parse_entity_name<'a>(header: &'a str, keyword: &str) -> Option<&'a str> {
	let rest = header.trim_start().strip_prefix(keyword)?;
	if !rest.starts_with(char::is_whitespace) {
		return None;
	}
	rest.split_whitespace().next()
}

/// Split `text` into verbatim spans and blocks of `class`, in document order.
///
/// Concatenating the segments (verbatim text, then header and body of each
/// block) reproduces `text` exactly. Never fails: text without any header
/// comes back as one verbatim span.
pub fn segment<'a>(text: &'a str, class: &BlockClass) -> Vec<Segment<'a>> {
	let mut segments = Vec::new();
	// (header start, body start) of the block being collected
	let mut open: Option<(usize, usize)> = None;
	let mut offset = 0;

	for line in text.split_inclusive('\n') {
		if class.is_header(line) {
			match open {
				Some((header_start, body_start)) => segments.push(Segment::Block(make_block(
					text,
					header_start,
					body_start,
					offset,
					class,
				))),
				None if offset > 0 => segments.push(Segment::Verbatim(&text[..offset])),
				None => {}
			}
			open = Some((offset, offset + line.len()));
		}
		offset += line.len();
	}

	match open {
		Some((header_start, body_start)) => segments.push(Segment::Block(make_block(
			text,
			header_start,
			body_start,
			text.len(),
			class,
		))),
		None if !text.is_empty() => segments.push(Segment::Verbatim(text)),
		None => {}
	}

	segments
}

fn make_block<'a>(
	text: &'a str,
	header_start: usize,
	body_start: usize,
	end: usize,
	class: &BlockClass,
) -> Block<'a> {
	let header = &text[header_start..body_start];
	Block {
		header,
		entity: parse_entity_name(header, &class.keyword).unwrap_or(UNKNOWN_ENTITY),
		body: &text[body_start..end],
	}
}
