use arrayvec::ArrayVec;
use glam::{vec3, Vec3};
use log::{debug, warn};
use shared::{MinMax, VecMinMax};
use tr_reader::model::{self as tr, ReadVersioned};
use crate::{
	error::resolve,
	level::{LightMode, Mesh, MeshVertex, Room, RoomId, RoomLight, RoomSprite, RoomStaticMesh, SpriteId, MAX_ROOM_LIGHTS},
	light::{intensity, room_light_intensity},
	LoadError,
};
use super::{mesh::{polygon, textured_texinfo}, quadrant_rotation, Loader};

impl<'a> Loader<'a> {
	fn room_geometry(&self, raw: &tr::Room) -> Result<Mesh, LoadError> {
		let origin = vec3(raw.x as f32, 0.0, raw.z as f32);
		let vertices = raw
			.vertices
			.iter()
			.map(|v| MeshVertex { position: v.pos.as_vec3() + origin, light: Vec3::splat(intensity(v.lighting)) })
			.collect::<Vec<_>>();
		let num_texinfos = self.level.texinfos.len();
		let mut polygons = Vec::with_capacity(raw.quads.len() + raw.tris.len());
		for face in raw.quads.iter() {
			polygons.push(polygon(face, textured_texinfo(face.texture), vertices.len(), num_texinfos)?);
		}
		for face in raw.tris.iter() {
			polygons.push(polygon(face, textured_texinfo(face.texture), vertices.len(), num_texinfos)?);
		}
		Ok(Mesh { light_mode: LightMode::Internal, vertices, polygons, center: Vec3::ZERO, radius: 0.0 })
	}

	/// Placements of externally lit meshes are dropped.
	fn room_static_meshes(&self, id: RoomId, raws: &[tr::RoomStaticMesh]) -> Result<Vec<RoomStaticMesh>, LoadError> {
		let mut static_meshes = Vec::with_capacity(raws.len());
		for raw in raws {
			let static_mesh = self
				.level
				.static_meshes
				.iter()
				.find(|s| s.id == raw.static_mesh_id as u32)
				.ok_or(LoadError::Reference {
					kind: "static mesh id",
					index: raw.static_mesh_id as usize,
					len: self.level.static_meshes.len(),
				})?;
			if self.level.meshes[static_mesh.mesh.index()].light_mode == LightMode::External {
				warn!("room {} static mesh {} references externally lit mesh {}", id.index(), static_mesh.id, static_mesh.mesh.index());
				continue;
			}
			static_meshes.push(RoomStaticMesh {
				mesh: static_mesh.mesh,
				transform: quadrant_rotation(raw.pos.as_vec3(), raw.rotation),
				light_intensity: intensity(raw.lighting),
			});
		}
		Ok(static_meshes)
	}

	fn convert_room(&self, id: RoomId, raw: tr::Room, num_rooms: usize) -> Result<Room, LoadError> {
		let geometry = self.room_geometry(&raw)?;
		let bounds = <MinMax<Vec3> as VecMinMax<Vec3>>::from_iter(geometry.vertices.iter().map(|v| v.position));
		let num_sprites = self.level.sprites.len();
		let sprites = raw
			.sprites
			.iter()
			.map(|s| {
				let vertex = &geometry.vertices[resolve("room vertex", s.vertex as usize, geometry.vertices.len())?];
				Ok(RoomSprite {
					sprite: SpriteId(resolve("sprite", s.sprite as usize, num_sprites)?),
					position: vertex.position,
					light_intensity: vertex.light.x,
				})
			})
			.collect::<Result<_, LoadError>>()?;
		if raw.lights.len() > MAX_ROOM_LIGHTS {
			warn!("room {} has {} lights, keeping {}", id.index(), raw.lights.len(), MAX_ROOM_LIGHTS);
		}
		let lights = raw
			.lights
			.iter()
			.take(MAX_ROOM_LIGHTS)
			.map(|l| RoomLight {
				position: l.pos.as_vec3(),
				intensity: room_light_intensity(l.intensity),
				falloff: l.falloff as f32,
			})
			.collect::<ArrayVec<_, MAX_ROOM_LIGHTS>>();
		let static_meshes = self.room_static_meshes(id, &raw.static_meshes)?;
		let alternate_room = raw
			.alternate_room
			.map(|r| resolve("room", r.get() as usize, num_rooms).map(RoomId))
			.transpose()?;
		Ok(Room {
			id,
			geometry,
			bounds,
			y_bottom: raw.y_bottom,
			y_top: raw.y_top,
			ambient_light: intensity(raw.ambient_light),
			light_mode: raw.light_mode,
			lights,
			static_meshes,
			sprites,
			alternate_room,
			flags: raw.flags,
		})
	}

	pub(super) fn load_rooms(&mut self) -> Result<(), LoadError> {
		let reader = &mut self.dir.rooms.reader(self.data);
		let num_rooms = self.dir.rooms.count as usize;
		for index in 0..num_rooms {
			let raw = tr::Room::read_versioned(reader, self.layout)?;
			let room = self.convert_room(RoomId(index), raw, num_rooms)?;
			self.level.rooms.push(room);
		}
		debug!("{} rooms", num_rooms);
		Ok(())
	}
}
