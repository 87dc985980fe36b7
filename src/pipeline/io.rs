//! Reading configuration dumps and writing rewritten ones.

use crate::error::{CfgmorphError, Result};
use std::io::{Read, Write};
use std::path::Path;

/// Decode bytes as UTF-8, dropping any invalid sequences.
pub fn decode_ignoring_errors(bytes: &[u8]) -> String {
	bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Read the input document. A path of `-` reads stdin.
pub fn read_input(path: &Path) -> Result<String> {
	let bytes = if path == Path::new("-") {
		let mut bytes = Vec::new();
		std::io::stdin().lock().read_to_end(&mut bytes).map(|_| bytes)
	} else {
		std::fs::read(path)
	}
	.map_err(|source| CfgmorphError::InputReadError {
		path: path.to_path_buf(),
		source,
	})?;

	Ok(decode_ignoring_errors(&bytes))
}

/// Write `text` to `path` atomically.
///
/// The text goes to a temporary file next to `path` which is then renamed
/// over it, so a failed write never leaves a truncated file behind.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
	let write_error = |source: std::io::Error| CfgmorphError::OutputWriteError {
		path: path.to_path_buf(),
		source,
	};

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
	file.write_all(text.as_bytes()).map_err(write_error)?;
	file.as_file().sync_all().map_err(write_error)?;
	file.persist(path).map_err(|e| write_error(e.error))?;

	Ok(())
}
