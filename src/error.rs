use std::{io, ops::Range, path::PathBuf};
use thiserror::Error;
use tr_reader::{FormatError, UnsupportedVersion};

#[derive(Error, Debug)]
pub enum LoadError {
	#[error("unable to read {}", path.display())]
	Open {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error(transparent)]
	Format(#[from] FormatError),
	#[error("{kind} {index} does not resolve, {len} loaded")]
	Reference {
		kind: &'static str,
		index: usize,
		len: usize,
	},
	#[error(transparent)]
	UnsupportedVersion(#[from] UnsupportedVersion),
}

impl From<io::Error> for LoadError {
	fn from(e: io::Error) -> Self {
		LoadError::Format(FormatError::Read(e))
	}
}

impl LoadError {
	pub(crate) fn inconsistent(message: String) -> Self {
		LoadError::Format(FormatError::Inconsistent(message))
	}
}

/// Checks `index` against the length of the sequence it points into.
pub(crate) fn resolve(kind: &'static str, index: usize, len: usize) -> Result<usize, LoadError> {
	match index < len {
		true => Ok(index),
		false => Err(LoadError::Reference { kind, index, len }),
	}
}

/// Checks `count` entries from `start`. An empty run resolves to `0..0` wherever it points.
pub(crate) fn resolve_range(kind: &'static str, start: usize, count: usize, len: usize) -> Result<Range<usize>, LoadError> {
	if count == 0 {
		return Ok(0..0);
	}
	let last = resolve(kind, start + count - 1, len)?;
	Ok(start..last + 1)
}
