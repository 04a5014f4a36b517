use byteorder::{ReadBytesExt, LE};
use glam::{vec2, Vec2};
use itertools::Itertools;
use log::debug;
use tr_reader::{directory::{NUM_PIXELS, PALETTE_SIZE}, model as tr, read_boxed_slice, read_words, Readable};
use crate::{error::resolve, level::{Texinfo, TexinfoId, Texpage, TexpageId}, LoadError};
use super::Loader;

/// Texinfos below this index are the palette colors.
pub const PALETTE_TEXINFOS: usize = PALETTE_SIZE as usize;

fn texel_center(coord: u8) -> f32 {
	(coord as f32 + 0.5) / 256.0
}

/// ARGB1555 to RGBA8.
fn pixel16(p: u16) -> [u8; 4] {
	let a = ((p >> 15) * 255) as u8;
	let r = ((p >> 7) & 248) as u8;
	let g = ((p >> 2) & 248) as u8;
	let b = ((p << 3) & 248) as u8;
	[r, g, b, a]
}

impl<'a> Loader<'a> {
	/// Page 0 row 0 holds the palette, texinfos 0..256 each sample one of its texels.
	pub(super) fn load_palette(&mut self) -> Result<(), LoadError> {
		let reader = &mut self.dir.palette.reader(self.data);
		let palette: Box<[tr::Color3]> = read_boxed_slice(reader, PALETTE_TEXINFOS)?;
		let mut page = Texpage::blank();
		for (index, color) in palette.iter().enumerate() {
			let alpha = match index {
				0 => 0,
				_ => 255,
			};
			page.pixels[index] = [color.r << 2, color.g << 2, color.b << 2, alpha];
			self.level.texinfos.push(Texinfo {
				texcoords: [vec2(texel_center(index as u8), texel_center(0)); 4],
				alpha_mode: 0,
				page: TexpageId(0),
				next: None,
			});
		}
		self.level.texpages.push(page);
		Ok(())
	}

	/// 16-bit pages when present, otherwise 8-bit pages through the palette.
	pub(super) fn load_texpages(&mut self) -> Result<(), LoadError> {
		match self.dir.texpages16 {
			Some(section) => {
				let words = read_words(&mut section.reader(self.data), section.len as usize / 2)?;
				for page in words.chunks_exact(NUM_PIXELS) {
					let pixels = page.iter().map(|&p| pixel16(p)).collect();
					self.level.texpages.push(Texpage { pixels });
				}
			},
			None => {
				let colors = self.level.texpages[0].pixels[..PALETTE_TEXINFOS].to_vec();
				for page in self.dir.texpages8.bytes(self.data).chunks_exact(NUM_PIXELS) {
					let pixels = page.iter().map(|&i| colors[i as usize]).collect();
					self.level.texpages.push(Texpage { pixels });
				}
			},
		}
		debug!("{} texture pages", self.level.texpages.len() - 1);
		Ok(())
	}

	pub(super) fn load_texinfos(&mut self) -> Result<(), LoadError> {
		let reader = &mut self.dir.texinfos.reader(self.data);
		let num_pages = self.level.texpages.len();
		for _ in 0..self.dir.texinfos.count {
			let raw = tr::TexInfo::read(reader)?;
			let page = resolve("texture page", raw.page as usize + 1, num_pages)?;
			self.level.texinfos.push(Texinfo {
				texcoords: raw.coords.map(|c| Vec2::new(texel_center(c.x), texel_center(c.y))),
				alpha_mode: raw.alpha_mode,
				page: TexpageId(page),
				next: None,
			});
		}
		self.load_texanim_chains()
	}

	/// Each chain becomes a ring of `next` links.
	fn load_texanim_chains(&mut self) -> Result<(), LoadError> {
		let section = self.dir.texanim_chains;
		if section.count == 0 {
			return Ok(());
		}
		let reader = &mut section.reader(self.data);
		let num_chains = reader.read_u16::<LE>()?;
		let num_texinfos = self.level.texinfos.len();
		for _ in 0..num_chains {
			let len = reader.read_u16::<LE>()? as usize + 1;
			let members = read_words(reader, len)?
				.into_iter()
				.map(|index| resolve("texinfo", index as usize + PALETTE_TEXINFOS, num_texinfos))
				.collect::<Result<Vec<_>, _>>()?;
			for (src, dest) in members.into_iter().circular_tuple_windows() {
				self.level.texinfos[src].next = Some(TexinfoId(dest));
			}
		}
		debug!("{} texture animation chains", num_chains);
		Ok(())
	}
}
