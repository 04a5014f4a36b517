pub mod frame;
pub mod room;

use std::io::{Read, Result};
use bitfield::bitfield;
use byteorder::{ReadBytesExt, LE};
use glam::{I16Vec3, IVec3};
use nonmax::NonMaxU16;
use shared::MinMax;
use crate::{read_boxed_slice, Readable};

pub use frame::FrameRotation;
pub use room::{Entity, ReadVersioned, Room, RoomLight, RoomSprite, RoomStaticMesh, RoomVertex};

/// 6 bits per channel
#[derive(Readable, Clone, Copy, Debug)]
pub struct Color3 {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

/// Whole-pixel coordinate, the fractional byte before each axis is ignored.
#[derive(Readable, Clone, Copy, Debug)]
pub struct TexCoord {
	#[skip(1)]
	pub x: u8,
	#[skip(1)]
	pub y: u8,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct TexInfo {
	pub alpha_mode: u16,
	/// Index into texture pages
	pub page: u16,
	pub coords: [TexCoord; 4],
}

bitfield! {
	#[derive(Readable, Clone, Copy)]
	pub struct TextureDetails(u16);
	impl Debug;
	/// Index into the palette, colored faces
	pub palette_index, _: 7, 0;
	/// Index into texinfos, textured faces
	pub texture_index, _: 14, 0;
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct Face<const N: usize> {
	pub vertex_indices: [u16; N],
	pub texture: TextureDetails,
}

/// Sign of the count selects the variant.
#[derive(Debug)]
pub enum MeshLighting {
	Normals(Box<[I16Vec3]>),
	/// 13-bit, 0 is brightest
	Intensities(Box<[i16]>),
}

impl Readable for MeshLighting {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(match reader.read_i16::<LE>()? {
			num if num > 0 => MeshLighting::Normals(read_boxed_slice(reader, num as usize)?),
			num => MeshLighting::Intensities(read_boxed_slice(reader, (num as i32).unsigned_abs() as usize)?),
		})
	}
}

#[derive(Readable, Debug)]
pub struct Mesh {
	pub center: I16Vec3,
	pub radius: i32,
	#[list(u16)]
	pub vertices: Box<[I16Vec3]>,
	pub lighting: MeshLighting,
	#[list(u16)]
	pub textured_quads: Box<[Face<4>]>,
	#[list(u16)]
	pub textured_tris: Box<[Face<3>]>,
	#[list(u16)]
	pub colored_quads: Box<[Face<4>]>,
	#[list(u16)]
	pub colored_tris: Box<[Face<3>]>,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct Animation {
	/// Byte offset into frame data
	pub frame_byte_offset: u32,
	/// Ticks per frame
	pub frame_rate: u8,
	/// Words per frame, 0 when frames are variable-length
	pub frame_size: u8,
	pub state_id: u16,
	#[skip(8)]//speed, acceleration
	pub first_tick: u16,
	pub last_tick: u16,
	/// Index into animations
	pub next_anim: u16,
	pub next_tick: u16,
	pub num_state_changes: u16,
	/// Index into state changes
	pub state_change_offset: u16,
	pub num_commands: u16,
	/// Index into animation commands
	pub command_offset: u16,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct StateChange {
	pub state_id: u16,
	pub num_ranges: u16,
	/// Index into animation ranges
	pub range_offset: u16,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct AnimRange {
	pub first_tick: u16,
	pub last_tick: u16,
	/// Index into animations
	pub next_anim: u16,
	pub next_tick: u16,
}

bitfield! {
	#[derive(Readable, Clone, Copy)]
	pub struct MeshNodeDetails(u32);
	impl Debug;
	pub pop, _: 0;
	pub push, _: 1;
}

/// One bone record, 4 dwords.
#[derive(Readable, Clone, Copy, Debug)]
pub struct MeshNode {
	pub details: MeshNodeDetails,
	/// Relative to parent
	pub offset: IVec3,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct Model {
	pub id: u32,
	pub num_meshes: u16,
	/// Index into mesh pointers
	pub first_mesh: u16,
	/// Dword offset into bone data
	pub bone_offset: u32,
	/// Byte offset into frame data
	pub frame_byte_offset: u32,
	/// Index into animations
	pub animation: Option<NonMaxU16>,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct BoundBox {
	pub x: MinMax<i16>,
	pub y: MinMax<i16>,
	pub z: MinMax<i16>,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct StaticMesh {
	pub id: u32,
	/// Index into mesh pointers
	pub mesh: u16,
	pub visibility: BoundBox,
	pub collision: BoundBox,
	pub flags: u16,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct SpriteTexture {
	/// Index into texture pages
	pub page: u16,
	pub x: u8,
	pub y: u8,
	/// Pixel width is `(width - 255) / 256`
	pub width: u16,
	pub height: u16,
	pub left: i16,
	pub top: i16,
	pub right: i16,
	pub bottom: i16,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct SpriteSequence {
	pub id: i32,
	pub neg_length: i16,
	/// Index into sprite textures
	pub first_sprite: u16,
}
