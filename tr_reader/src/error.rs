use std::io;
use thiserror::Error;

/// The file does not match the layout of its declared version.
#[derive(Error, Debug)]
pub enum FormatError {
	#[error("level data ends at byte {expected} but the file is {actual} bytes")]
	EndMismatch { expected: u64, actual: u64 },
	#[error("file truncated while scanning {section}")]
	Truncated {
		section: &'static str,
		#[source]
		source: io::Error,
	},
	#[error("section data overruns its declared span: {0}")]
	Read(#[from] io::Error),
	#[error("{0}")]
	Inconsistent(String),
}
