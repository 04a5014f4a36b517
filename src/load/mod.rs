mod anim;
mod mesh;
mod model;
mod object;
mod room;
mod sprite;
mod texture;

use std::{f32::consts::FRAC_PI_2, fs, path::Path};
use glam::{Mat4, Vec3};
use log::{debug, info, warn};
use tr_reader::{Directory, Layout, Version};
use crate::{level::Level, LoadError};

/// Quarter turns around y from the top two bits of a stored rotation.
fn quadrant_rotation(position: Vec3, rotation: u16) -> Mat4 {
	let quadrant = (rotation >> 14) & 3;
	Mat4::from_translation(position) * Mat4::from_rotation_y(quadrant as f32 * FRAC_PI_2)
}

/// Decodes sections of `data` into `level`, one method per section family.
struct Loader<'a> {
	data: &'a [u8],
	dir: Directory,
	layout: &'static Layout,
	level: Level,
}

impl Level {
	pub fn load<P: AsRef<Path>>(path: P, version: Version) -> Result<Self, LoadError> {
		let path = path.as_ref();
		let data = fs::read(path).map_err(|source| LoadError::Open { path: path.to_owned(), source })?;
		debug!("read {} bytes from {}", data.len(), path.display());
		Self::from_bytes(&data, version)
	}

	/// `selector` is parsed before the file is touched.
	pub fn open<P: AsRef<Path>>(path: P, selector: &str) -> Result<Self, LoadError> {
		let version = selector.parse::<Version>()?;
		Self::load(path, version)
	}

	pub fn from_bytes(data: &[u8], version: Version) -> Result<Self, LoadError> {
		let layout = version.layout();
		let dir = Directory::scan(data, layout)?;
		if dir.version != layout.magic {
			warn!("version word is {:#x}, expected {:#x} for {}", dir.version, layout.magic, version);
		}
		let mut loader = Loader { data, dir, layout, level: Level::empty(version) };
		loader.load_palette()?;
		loader.load_texpages()?;
		loader.load_texinfos()?;
		loader.load_meshes()?;
		loader.load_animations()?;
		loader.load_models()?;
		loader.load_sprites()?;
		loader.load_sprite_sequences()?;
		loader.load_static_meshes()?;
		loader.load_rooms()?;
		loader.load_objects()?;
		let level = loader.level;
		info!(
			"loaded {} level: {} rooms, {} meshes, {} models, {} animations, {} model objects, {} sprite objects",
			version,
			level.rooms.len(),
			level.meshes.len(),
			level.models.len(),
			level.animations.len(),
			level.model_objects.len(),
			level.sprite_objects.len(),
		);
		Ok(level)
	}
}
