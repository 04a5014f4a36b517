use std::ops::Range;
use arrayvec::ArrayVec;
use glam::{Mat4, Vec2, Vec3};
use shared::MinMax;
use tr_reader::{directory::NUM_PIXELS, Version};
use crate::anim::{FrameBuffer, Keyframe, Playback};

macro_rules! ids {
	($($(#[$attr:meta])* $name:ident),* $(,)?) => {
		$(
			$(#[$attr])*
			#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
			pub struct $name(pub usize);

			impl $name {
				pub fn index(self) -> usize {
					self.0
				}
			}
		)*
	};
}

ids!(
	RoomId,
	/// 0..256 are the palette colors
	TexinfoId,
	MeshId,
	ModelId,
	SpriteId,
	SequenceId,
	AnimationId,
	/// 0 is the palette page
	TexpageId,
);

pub const MAX_ROOM_LIGHTS: usize = 8;

/// 256x256 RGBA.
#[derive(Clone, Debug)]
pub struct Texpage {
	pub pixels: Box<[[u8; 4]]>,
}

impl Texpage {
	pub fn blank() -> Self {
		Self { pixels: vec![[0; 4]; NUM_PIXELS].into_boxed_slice() }
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Texinfo {
	pub texcoords: [Vec2; 4],
	pub alpha_mode: u16,
	pub page: TexpageId,
	/// Following member of this texinfo's animation chain
	pub next: Option<TexinfoId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightMode {
	/// Vertex light is a baked intensity on all three channels
	Internal,
	/// Vertex light is a normal
	External,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
	pub position: Vec3,
	pub light: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
	/// 3 or 4 indices into the mesh vertices
	pub vertices: ArrayVec<u16, 4>,
	pub texinfo: TexinfoId,
}

#[derive(Clone, Debug)]
pub struct Mesh {
	pub light_mode: LightMode,
	pub vertices: Vec<MeshVertex>,
	pub polygons: Vec<Polygon>,
	pub center: Vec3,
	pub radius: f32,
}

#[derive(Clone, Debug)]
pub struct Animation {
	pub state_id: u16,
	pub ticks_per_frame: u16,
	pub first_tick: u16,
	pub last_tick: u16,
	/// Not followed by playback
	pub next_animation: AnimationId,
	pub next_tick: u16,
	/// Word offset of the first record in the frame buffer
	pub frame_offset: usize,
	/// Indices of this animation's records in the frame buffer
	pub keyframes: Range<usize>,
	pub state_changes: Range<usize>,
	/// Word index of the first command in `anim_commands`
	pub command_offset: usize,
	pub num_commands: usize,
}

impl Animation {
	pub fn ticks(&self) -> MinMax<u16> {
		MinMax { min: self.first_tick, max: self.last_tick }
	}
}

#[derive(Clone, Debug)]
pub struct StateChange {
	pub state_id: u16,
	pub ranges: Range<usize>,
}

#[derive(Clone, Copy, Debug)]
pub struct AnimRange {
	pub first_tick: u16,
	pub last_tick: u16,
	pub next_animation: AnimationId,
	pub next_tick: u16,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelNode {
	/// Always lower than this node's own index, `None` only for the root
	pub parent: Option<usize>,
	pub offset: Vec3,
	pub mesh: MeshId,
}

#[derive(Clone, Debug)]
pub struct Model {
	pub id: u32,
	pub nodes: Vec<ModelNode>,
	pub animation: Option<AnimationId>,
	/// Records of `animation`, one rotation per node
	pub keyframes: Vec<Keyframe>,
}

#[derive(Clone, Copy, Debug)]
pub struct StaticMesh {
	pub id: u32,
	pub mesh: MeshId,
	pub visibility: MinMax<Vec3>,
	pub collision: MinMax<Vec3>,
	pub flags: u16,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
	/// Y down
	pub positions: [Vec2; 4],
	pub texcoords: [Vec2; 4],
	pub page: TexpageId,
}

#[derive(Clone, Debug)]
pub struct SpriteSequence {
	pub id: i32,
	pub sprites: Vec<SpriteId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomLight {
	pub position: Vec3,
	pub intensity: f32,
	pub falloff: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct RoomStaticMesh {
	pub mesh: MeshId,
	pub transform: Mat4,
	pub light_intensity: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct RoomSprite {
	pub sprite: SpriteId,
	pub position: Vec3,
	pub light_intensity: f32,
}

#[derive(Clone, Debug)]
pub struct Room {
	pub id: RoomId,
	/// Always internally lit, positions in world coords
	pub geometry: Mesh,
	/// Extent of the geometry vertices, none for a room without vertices
	pub bounds: Option<MinMax<Vec3>>,
	pub y_bottom: i32,
	pub y_top: i32,
	pub ambient_light: f32,
	pub light_mode: u16,
	pub lights: ArrayVec<RoomLight, MAX_ROOM_LIGHTS>,
	pub static_meshes: Vec<RoomStaticMesh>,
	pub sprites: Vec<RoomSprite>,
	pub alternate_room: Option<RoomId>,
	pub flags: u16,
}

#[derive(Clone, Debug)]
pub struct ModelObject {
	pub model: ModelId,
	pub room: RoomId,
	pub transform: Mat4,
	pub light_intensity: f32,
	/// `None` when the model has no animation
	pub playback: Option<Playback>,
	/// One per model node, relative to `transform`
	pub node_transforms: Vec<Mat4>,
}

#[derive(Clone, Copy, Debug)]
pub struct SpriteObject {
	pub sequence: SequenceId,
	pub frame: usize,
	pub room: RoomId,
	pub position: Vec3,
	pub light_intensity: f32,
}

/// Owns everything decoded from one level file.
#[derive(Debug)]
pub struct Level {
	pub version: Version,
	pub rooms: Vec<Room>,
	pub texpages: Vec<Texpage>,
	pub texinfos: Vec<Texinfo>,
	pub meshes: Vec<Mesh>,
	pub models: Vec<Model>,
	pub static_meshes: Vec<StaticMesh>,
	pub sprites: Vec<Sprite>,
	pub sprite_sequences: Vec<SpriteSequence>,
	pub animations: Vec<Animation>,
	pub state_changes: Vec<StateChange>,
	pub anim_ranges: Vec<AnimRange>,
	pub anim_commands: Vec<u16>,
	pub frames: FrameBuffer,
	pub model_objects: Vec<ModelObject>,
	pub sprite_objects: Vec<SpriteObject>,
}

impl Level {
	pub(crate) fn empty(version: Version) -> Self {
		Self {
			version,
			rooms: vec![],
			texpages: vec![],
			texinfos: vec![],
			meshes: vec![],
			models: vec![],
			static_meshes: vec![],
			sprites: vec![],
			sprite_sequences: vec![],
			animations: vec![],
			state_changes: vec![],
			anim_ranges: vec![],
			anim_commands: vec![],
			frames: FrameBuffer::default(),
			model_objects: vec![],
			sprite_objects: vec![],
		}
	}

	pub fn room(&self, id: RoomId) -> &Room {
		&self.rooms[id.index()]
	}

	pub fn texinfo(&self, id: TexinfoId) -> &Texinfo {
		&self.texinfos[id.index()]
	}

	pub fn mesh(&self, id: MeshId) -> &Mesh {
		&self.meshes[id.index()]
	}

	pub fn model(&self, id: ModelId) -> &Model {
		&self.models[id.index()]
	}

	pub fn sprite(&self, id: SpriteId) -> &Sprite {
		&self.sprites[id.index()]
	}

	pub fn animation(&self, id: AnimationId) -> &Animation {
		&self.animations[id.index()]
	}
}
