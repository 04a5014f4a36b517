use std::{fs, path::Path};
use anyhow::Result;
use image::{Rgba, RgbaImage};
use log::info;
use tr_reader::directory::IMAGE_SIZE;
use crate::level::{Level, Texpage};

const IMG_DIM: u32 = IMAGE_SIZE as u32;

pub fn texpage_image(page: &Texpage) -> RgbaImage {
	RgbaImage::from_fn(IMG_DIM, IMG_DIM, |x, y| Rgba(page.pixels[(y * IMG_DIM + x) as usize]))
}

/// Writes `texpage_<n>.png` for every page, page 0 being the palette.
pub fn save_texpages<P: AsRef<Path>>(level: &Level, dir: P) -> Result<()> {
	let dir = dir.as_ref();
	fs::create_dir_all(dir)?;
	for (index, page) in level.texpages.iter().enumerate() {
		texpage_image(page).save(dir.join(format!("texpage_{}.png", index)))?;
	}
	info!("wrote {} texture pages to {}", level.texpages.len(), dir.display());
	Ok(())
}
