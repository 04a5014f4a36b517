extern crate self as tr_reader;

pub mod directory;
pub mod error;
pub mod model;
pub mod version;
pub(crate) mod impls;

use std::io::{self, ErrorKind, Read, Result};
use byteorder::{ReadBytesExt, LE};
use num_traits::AsPrimitive;
pub use tr_derive::Readable;
pub use directory::{Directory, Section};
pub use error::FormatError;
pub use version::{Layout, UnsupportedVersion, Version};

pub trait Readable: Sized {
	fn read<R: Read>(reader: &mut R) -> Result<Self>;
}

pub fn read_boxed_slice<R: Read, T: Readable>(reader: &mut R, len: usize) -> Result<Box<[T]>> {
	let mut vec = Vec::with_capacity(len);
	for _ in 0..len {
		vec.push(T::read(reader)?);
	}
	Ok(vec.into_boxed_slice())
}

pub fn read_list<R: Read, T: Readable, L: Readable + AsPrimitive<usize>>(reader: &mut R) -> Result<Box<[T]>> {
	let len = L::read(reader)?.as_();
	read_boxed_slice(reader, len)
}

/// Bulk read of `len` little-endian words.
pub fn read_words<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u16>> {
	let mut words = vec![0; len];
	reader.read_u16_into::<LE>(&mut words)?;
	Ok(words)
}

pub fn skip<R: Read>(reader: &mut R, num: u64) -> Result<()> {
	let skipped = io::copy(&mut reader.take(num), &mut io::sink())?;
	if skipped != num {
		return Err(io::Error::new(ErrorKind::UnexpectedEof, "skipped past end of data"));
	}
	Ok(())
}
