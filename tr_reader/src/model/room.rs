use std::io::{Cursor, Read, Result};
use byteorder::{ReadBytesExt, LE};
use glam::{I16Vec3, IVec3};
use nonmax::NonMaxU16;
use crate::{read_boxed_slice, read_list, skip, Layout, Readable};
use super::Face;

/// Records whose width depends on the level version.
pub trait ReadVersioned: Sized {
	fn read_versioned<R: Read>(reader: &mut R, layout: &Layout) -> Result<Self>;
}

fn read_second<R: Read>(reader: &mut R, layout: &Layout) -> Result<u16> {
	match layout.dual_lighting {
		true => reader.read_u16::<LE>(),
		false => Ok(0),
	}
}

pub fn read_list_versioned<R: Read, T: ReadVersioned>(reader: &mut R, layout: &Layout) -> Result<Box<[T]>> {
	let len = reader.read_u16::<LE>()? as usize;
	let mut vec = Vec::with_capacity(len);
	for _ in 0..len {
		vec.push(T::read_versioned(reader, layout)?);
	}
	Ok(vec.into_boxed_slice())
}

#[derive(Clone, Copy, Debug)]
pub struct RoomVertex {
	/// Relative to room
	pub pos: I16Vec3,
	/// 13-bit, 0 is brightest
	pub lighting: u16,
	pub attributes: u16,
	pub lighting2: u16,
}

impl ReadVersioned for RoomVertex {
	fn read_versioned<R: Read>(reader: &mut R, layout: &Layout) -> Result<Self> {
		let pos = I16Vec3::read(reader)?;
		let lighting = reader.read_u16::<LE>()?;
		let attributes = read_second(reader, layout)?;
		let lighting2 = read_second(reader, layout)?;
		Ok(RoomVertex { pos, lighting, attributes, lighting2 })
	}
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct RoomSprite {
	/// Index into room vertices
	pub vertex: u16,
	/// Index into sprite textures
	pub sprite: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct RoomLight {
	pub pos: IVec3,
	pub intensity: i16,
	pub intensity2: i16,
	pub falloff: i32,
	pub falloff2: i32,
}

impl ReadVersioned for RoomLight {
	fn read_versioned<R: Read>(reader: &mut R, layout: &Layout) -> Result<Self> {
		let pos = IVec3::read(reader)?;
		let intensity = reader.read_i16::<LE>()?;
		let intensity2 = read_second(reader, layout)? as i16;
		let falloff = reader.read_i32::<LE>()?;
		let falloff2 = match layout.dual_lighting {
			true => reader.read_i32::<LE>()?,
			false => 0,
		};
		Ok(RoomLight { pos, intensity, intensity2, falloff, falloff2 })
	}
}

#[derive(Clone, Copy, Debug)]
pub struct RoomStaticMesh {
	/// World coords
	pub pos: IVec3,
	/// Top two bits are the quadrant
	pub rotation: u16,
	pub lighting: u16,
	pub lighting2: u16,
	/// Matched against static mesh ids
	pub static_mesh_id: u16,
}

impl ReadVersioned for RoomStaticMesh {
	fn read_versioned<R: Read>(reader: &mut R, layout: &Layout) -> Result<Self> {
		let pos = IVec3::read(reader)?;
		let rotation = reader.read_u16::<LE>()?;
		let lighting = reader.read_u16::<LE>()?;
		let lighting2 = read_second(reader, layout)?;
		let static_mesh_id = reader.read_u16::<LE>()?;
		Ok(RoomStaticMesh { pos, rotation, lighting, lighting2, static_mesh_id })
	}
}

#[derive(Debug)]
pub struct Room {
	pub x: i32,
	pub z: i32,
	pub y_bottom: i32,
	pub y_top: i32,
	pub vertices: Box<[RoomVertex]>,
	pub quads: Box<[Face<4>]>,
	pub tris: Box<[Face<3>]>,
	pub sprites: Box<[RoomSprite]>,
	pub ambient_light: i16,
	pub ambient_light2: i16,
	pub light_mode: u16,
	pub lights: Box<[RoomLight]>,
	pub static_meshes: Box<[RoomStaticMesh]>,
	/// Index into rooms
	pub alternate_room: Option<NonMaxU16>,
	pub flags: u16,
}

impl ReadVersioned for Room {
	fn read_versioned<R: Read>(reader: &mut R, layout: &Layout) -> Result<Self> {
		let x = reader.read_i32::<LE>()?;
		let z = reader.read_i32::<LE>()?;
		let y_bottom = reader.read_i32::<LE>()?;
		let y_top = reader.read_i32::<LE>()?;
		let num_data_words = reader.read_u32::<LE>()? as usize;
		let data: Box<[u8]> = read_boxed_slice(reader, num_data_words * 2)?;
		let data_reader = &mut Cursor::new(&data[..]);
		let vertices = read_list_versioned(data_reader, layout)?;
		let quads = read_list::<_, _, u16>(data_reader)?;
		let tris = read_list::<_, _, u16>(data_reader)?;
		let sprites = read_list::<_, _, u16>(data_reader)?;
		let num_portals = reader.read_u16::<LE>()?;
		skip(reader, num_portals as u64 * 32)?;
		let num_z_sectors = reader.read_u16::<LE>()?;
		let num_x_sectors = reader.read_u16::<LE>()?;
		skip(reader, num_z_sectors as u64 * num_x_sectors as u64 * 8)?;
		let ambient_light = reader.read_i16::<LE>()?;
		let (ambient_light2, light_mode) = match layout.extended_ambient {
			true => (reader.read_i16::<LE>()?, reader.read_u16::<LE>()?),
			false => (0, 0),
		};
		let lights = read_list_versioned(reader, layout)?;
		let static_meshes = read_list_versioned(reader, layout)?;
		let alternate_room = Readable::read(reader)?;
		let flags = reader.read_u16::<LE>()?;
		Ok(Room {
			x,
			z,
			y_bottom,
			y_top,
			vertices,
			quads,
			tris,
			sprites,
			ambient_light,
			ambient_light2,
			light_mode,
			lights,
			static_meshes,
			alternate_room,
			flags,
		})
	}
}

/// Placed object, called an item by the level format.
#[derive(Clone, Copy, Debug)]
pub struct Entity {
	/// Matched against model and sprite sequence ids
	pub type_id: u16,
	/// Index into rooms
	pub room: u16,
	/// World coords
	pub pos: IVec3,
	pub rotation: u16,
	/// 13-bit, 0xFFFF means fully lit
	pub intensity: u16,
	pub intensity2: u16,
	pub flags: u16,
}

impl ReadVersioned for Entity {
	fn read_versioned<R: Read>(reader: &mut R, layout: &Layout) -> Result<Self> {
		let type_id = reader.read_u16::<LE>()?;
		let room = reader.read_u16::<LE>()?;
		let pos = IVec3::read(reader)?;
		let rotation = reader.read_u16::<LE>()?;
		let intensity = reader.read_u16::<LE>()?;
		let intensity2 = read_second(reader, layout)?;
		let flags = reader.read_u16::<LE>()?;
		Ok(Entity { type_id, room, pos, rotation, intensity, intensity2, flags })
	}
}
