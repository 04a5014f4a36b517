use glam::{vec2, vec3, Vec3};
use log::debug;
use shared::MinMax;
use tr_reader::{model as tr, read_boxed_slice};
use crate::{error::resolve, level::{MeshId, Sprite, SpriteId, SpriteSequence, StaticMesh, TexpageId}, LoadError};
use super::Loader;

fn sprite_geometry(raw: &tr::SpriteTexture, page: TexpageId) -> Sprite {
	let u0 = (raw.x as f32 + 0.5) / 256.0;
	let v0 = (raw.y as f32 + 0.5) / 256.0;
	let du = ((raw.width as f32 - 255.0) / 256.0) / 256.0;
	let dv = ((raw.height as f32 - 255.0) / 256.0) / 256.0;
	let (left, top, right, bottom) = (raw.left as f32, raw.top as f32, raw.right as f32, raw.bottom as f32);
	Sprite {
		positions: [vec2(left, -bottom), vec2(left, -top), vec2(right, -top), vec2(right, -bottom)],
		texcoords: [vec2(u0, v0 + dv), vec2(u0, v0), vec2(u0 + du, v0), vec2(u0 + du, v0 + dv)],
		page,
	}
}

fn bound_box(raw: &tr::BoundBox) -> MinMax<Vec3> {
	let axes = [raw.x, raw.y, raw.z].map(|axis| axis.map(|v| v as f32));
	MinMax {
		min: vec3(axes[0].min, axes[1].min, axes[2].min),
		max: vec3(axes[0].max, axes[1].max, axes[2].max),
	}
}

impl<'a> Loader<'a> {
	pub(super) fn load_sprites(&mut self) -> Result<(), LoadError> {
		let raws: Box<[tr::SpriteTexture]> = read_boxed_slice(&mut self.dir.sprites.reader(self.data), self.dir.sprites.count as usize)?;
		let num_pages = self.level.texpages.len();
		for raw in raws.iter() {
			let page = TexpageId(resolve("texture page", raw.page as usize + 1, num_pages)?);
			self.level.sprites.push(sprite_geometry(raw, page));
		}
		Ok(())
	}

	pub(super) fn load_sprite_sequences(&mut self) -> Result<(), LoadError> {
		let raws: Box<[tr::SpriteSequence]> = read_boxed_slice(
			&mut self.dir.sprite_sequences.reader(self.data),
			self.dir.sprite_sequences.count as usize,
		)?;
		let num_sprites = self.level.sprites.len();
		for raw in raws.iter() {
			let len = usize::try_from(-(raw.neg_length as i32)).map_err(|_| {
				LoadError::inconsistent(format!("sprite sequence {} has positive length {}", raw.id, raw.neg_length))
			})?;
			let sprites = (raw.first_sprite as usize..raw.first_sprite as usize + len)
				.map(|index| resolve("sprite", index, num_sprites).map(SpriteId))
				.collect::<Result<_, _>>()?;
			self.level.sprite_sequences.push(SpriteSequence { id: raw.id, sprites });
		}
		debug!("{} sprites in {} sequences", num_sprites, self.level.sprite_sequences.len());
		Ok(())
	}

	pub(super) fn load_static_meshes(&mut self) -> Result<(), LoadError> {
		let raws: Box<[tr::StaticMesh]> = read_boxed_slice(&mut self.dir.static_meshes.reader(self.data), self.dir.static_meshes.count as usize)?;
		let num_meshes = self.level.meshes.len();
		for raw in raws.iter() {
			self.level.static_meshes.push(StaticMesh {
				id: raw.id,
				mesh: MeshId(resolve("mesh", raw.mesh as usize, num_meshes)?),
				visibility: bound_box(&raw.visibility),
				collision: bound_box(&raw.collision),
				flags: raw.flags,
			});
		}
		Ok(())
	}
}
