use std::io::{self, Cursor, ErrorKind};
use byteorder::{ReadBytesExt, LE};
use crate::{FormatError, Layout};

pub const PALETTE_SIZE: u32 = 256;
pub const IMAGE_SIZE: usize = 256;
pub const NUM_PIXELS: usize = IMAGE_SIZE * IMAGE_SIZE;
const LIGHT_MAP_SIZE: u64 = 32 * PALETTE_SIZE as u64;

/// Location of one section's payload. `offset` is just past its count field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Section {
	pub offset: u64,
	pub count: u32,
	/// Bytes
	pub len: u64,
}

impl Section {
	pub fn end(&self) -> u64 {
		self.offset + self.len
	}

	/// Only valid for the data the directory was scanned from.
	pub fn bytes<'a>(&self, data: &'a [u8]) -> &'a [u8] {
		&data[self.offset as usize..self.end() as usize]
	}

	pub fn reader<'a>(&self, data: &'a [u8]) -> Cursor<&'a [u8]> {
		Cursor::new(self.bytes(data))
	}
}

/// Offsets and counts of every section the decoders use.
#[derive(Clone, Debug)]
pub struct Directory {
	pub version: u32,
	/// 256 6-bit RGB triples
	pub palette: Section,
	/// 256 RGBA quads, V2 only
	pub palette32: Option<Section>,
	pub texpages8: Section,
	/// V2 only
	pub texpages16: Option<Section>,
	pub rooms: Section,
	/// Word count
	pub mesh_data: Section,
	pub mesh_pointers: Section,
	pub animations: Section,
	pub state_changes: Section,
	pub anim_ranges: Section,
	/// Word count
	pub anim_commands: Section,
	/// Dword count
	pub bones: Section,
	/// Word count
	pub frames: Section,
	pub models: Section,
	pub static_meshes: Section,
	pub texinfos: Section,
	pub sprites: Section,
	pub sprite_sequences: Section,
	/// Word count
	pub texanim_chains: Section,
	pub objects: Section,
	pub end: u64,
}

struct Scanner<'a> {
	cursor: Cursor<&'a [u8]>,
}

fn eof() -> io::Error {
	io::Error::new(ErrorKind::UnexpectedEof, "section extends past end of file")
}

impl<'a> Scanner<'a> {
	fn pos(&self) -> u64 {
		self.cursor.position()
	}

	fn skip(&mut self, section: &'static str, len: u64) -> Result<(), FormatError> {
		let pos = self.pos() + len;
		if pos > self.cursor.get_ref().len() as u64 {
			return Err(FormatError::Truncated { section, source: eof() });
		}
		self.cursor.set_position(pos);
		Ok(())
	}

	fn u16(&mut self, section: &'static str) -> Result<u16, FormatError> {
		self.cursor.read_u16::<LE>().map_err(|source| FormatError::Truncated { section, source })
	}

	fn u32(&mut self, section: &'static str) -> Result<u32, FormatError> {
		self.cursor.read_u32::<LE>().map_err(|source| FormatError::Truncated { section, source })
	}

	fn fixed(&mut self, section: &'static str, count: u32, stride: u64) -> Result<Section, FormatError> {
		let offset = self.pos();
		let len = count as u64 * stride;
		self.skip(section, len)?;
		Ok(Section { offset, count, len })
	}

	fn list16(&mut self, section: &'static str, stride: u64) -> Result<Section, FormatError> {
		let count = self.u16(section)? as u32;
		self.fixed(section, count, stride)
	}

	fn list32(&mut self, section: &'static str, stride: u64) -> Result<Section, FormatError> {
		let count = self.u32(section)?;
		self.fixed(section, count, stride)
	}

	/// Rooms are variable-length, every nested count is read to find the next room.
	fn rooms(&mut self, layout: &Layout) -> Result<Section, FormatError> {
		let count = self.u16("rooms")? as u32;
		let offset = self.pos();
		for _ in 0..count {
			self.skip("room info", 16)?;
			let num_data_words = self.u32("room data")?;
			self.skip("room data", num_data_words as u64 * 2)?;
			self.list16("room portals", 32)?;
			let num_z_sectors = self.u16("room sectors")?;
			let num_x_sectors = self.u16("room sectors")?;
			self.skip("room sectors", num_z_sectors as u64 * num_x_sectors as u64 * 8)?;
			self.skip("room ambient light", if layout.extended_ambient { 6 } else { 2 })?;
			self.list16("room lights", layout.room_light_size)?;
			self.list16("room static meshes", layout.room_static_mesh_size)?;
			self.skip("room flags", 4)?;//alternate room, flags
		}
		Ok(Section { offset, count, len: self.pos() - offset })
	}
}

impl Directory {
	/// Walks the whole file. The scan must land exactly on the end of `data`.
	pub fn scan(data: &[u8], layout: &Layout) -> Result<Self, FormatError> {
		let s = &mut Scanner { cursor: Cursor::new(data) };
		let version = s.u32("version")?;
		let leading_palettes = match layout.leading_palettes {
			true => Some((s.fixed("palette", PALETTE_SIZE, 3)?, s.fixed("palette", PALETTE_SIZE, 4)?)),
			false => None,
		};
		let num_texpages = s.u32("texture pages")?;
		let texpages8 = s.fixed("texture pages", num_texpages, NUM_PIXELS as u64)?;
		let texpages16 = match layout.texpages16 {
			true => Some(s.fixed("16-bit texture pages", num_texpages, NUM_PIXELS as u64 * 2)?),
			false => None,
		};
		s.skip("unused", 4)?;
		let rooms = s.rooms(layout)?;
		s.list32("floor data", 2)?;
		let mesh_data = s.list32("mesh data", 2)?;
		let mesh_pointers = s.list32("mesh pointers", 4)?;
		let animations = s.list32("animations", 32)?;
		let state_changes = s.list32("state changes", 6)?;
		let anim_ranges = s.list32("animation ranges", 8)?;
		let anim_commands = s.list32("animation commands", 2)?;
		let bones = s.list32("bone data", 4)?;
		let frames = s.list32("frame data", 2)?;
		let models = s.list32("models", 18)?;
		let static_meshes = s.list32("static meshes", 32)?;
		let texinfos = s.list32("texinfos", 20)?;
		let sprites = s.list32("sprites", 16)?;
		let sprite_sequences = s.list32("sprite sequences", 8)?;
		s.list32("cameras", 16)?;
		s.list32("sound sources", 16)?;
		let boxes = s.list32("boxes", layout.box_size)?;
		s.list32("overlaps", 2)?;
		s.fixed("zones", boxes.count, layout.zone_size)?;
		let texanim_chains = s.list32("texture animations", 2)?;
		let objects = s.list32("objects", layout.object_size)?;
		s.skip("light map", LIGHT_MAP_SIZE)?;
		let (palette, palette32) = match leading_palettes {
			Some((palette, palette32)) => (palette, Some(palette32)),
			None => (s.fixed("palette", PALETTE_SIZE, 3)?, None),
		};
		s.list16("cinematic frames", 16)?;
		s.list16("demo data", 1)?;
		s.skip("sound map", layout.sound_map_len * 2)?;
		s.list32("sound details", 8)?;
		if layout.embedded_samples {
			s.list32("samples", 1)?;
		}
		s.list32("sample indices", 4)?;
		let end = s.pos();
		let actual = data.len() as u64;
		if end != actual {
			return Err(FormatError::EndMismatch { expected: end, actual });
		}
		Ok(Directory {
			version,
			palette,
			palette32,
			texpages8,
			texpages16,
			rooms,
			mesh_data,
			mesh_pointers,
			animations,
			state_changes,
			anim_ranges,
			anim_commands,
			bones,
			frames,
			models,
			static_meshes,
			texinfos,
			sprites,
			sprite_sequences,
			texanim_chains,
			objects,
			end,
		})
	}
}
