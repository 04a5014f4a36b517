//! Writes synthetic level files for tests.

use byteorder::{WriteBytesExt, LE};
use glam::U16Vec3;
use tr_reader::{directory::NUM_PIXELS, model::FrameRotation, Version};
use crate::level::Level;

/// Two-word Euler triple in canonical word order.
pub fn euler_words(angles: U16Vec3) -> [u16; 2] {
	[(angles.x << 4) | (angles.y >> 6), ((angles.y & 63) << 10) | angles.z]
}

pub fn rotation_words(rotation: FrameRotation) -> Vec<u16> {
	match rotation {
		FrameRotation::X(x) => vec![0x4000 | x],
		FrameRotation::Y(y) => vec![0x8000 | y],
		FrameRotation::Z(z) => vec![0xC000 | z],
		FrameRotation::All(angles) => euler_words(angles).to_vec(),
	}
}

/// The same rotation as a triple.
fn triple(rotation: FrameRotation) -> U16Vec3 {
	match rotation {
		FrameRotation::X(x) => U16Vec3::new(x, 0, 0),
		FrameRotation::Y(y) => U16Vec3::new(0, y, 0),
		FrameRotation::Z(z) => U16Vec3::new(0, 0, z),
		FrameRotation::All(angles) => angles,
	}
}

fn w16(out: &mut Vec<u8>, v: u16) {
	out.write_u16::<LE>(v).unwrap();
}

fn wi16(out: &mut Vec<u8>, v: i16) {
	out.write_i16::<LE>(v).unwrap();
}

fn w32(out: &mut Vec<u8>, v: u32) {
	out.write_u32::<LE>(v).unwrap();
}

fn wi32(out: &mut Vec<u8>, v: i32) {
	out.write_i32::<LE>(v).unwrap();
}

fn wlen(out: &mut Vec<u8>, len: usize) {
	w32(out, len as u32);
}

#[derive(Clone, Debug, Default)]
pub struct MeshDef {
	pub vertices: Vec<[i16; 3]>,
	/// Normals instead of intensities
	pub normals: bool,
	/// Overrides the written light count
	pub light_count: Option<i16>,
	pub textured_quads: Vec<([u16; 4], u16)>,
	pub colored_tris: Vec<([u16; 3], u16)>,
	pub radius: i32,
}

impl MeshDef {
	pub fn lit(num_vertices: i16) -> Self {
		Self { vertices: (0..num_vertices).map(|i| [i, 0, 0]).collect(), ..Default::default() }
	}

	fn write(&self, out: &mut Vec<u8>) {
		out.extend([0; 6]);//center
		wi32(out, self.radius);
		wi16(out, self.vertices.len() as i16);
		for v in self.vertices.iter() {
			v.iter().for_each(|&c| wi16(out, c));
		}
		let num = self.vertices.len() as i16;
		match self.normals {
			true => {
				wi16(out, self.light_count.unwrap_or(num));
				for _ in 0..num {
					[0, -16384, 0].iter().for_each(|&c| wi16(out, c));
				}
			},
			false => {
				wi16(out, self.light_count.map(|c| -c).unwrap_or(-num));
				for i in 0..self.light_count.unwrap_or(num) {
					w16(out, (i as u16 % 2) * 4096);
				}
			},
		}
		wi16(out, self.textured_quads.len() as i16);
		for (indices, texture) in self.textured_quads.iter() {
			indices.iter().for_each(|&i| w16(out, i));
			w16(out, *texture);
		}
		wi16(out, 0);//textured tris
		wi16(out, 0);//colored quads
		wi16(out, self.colored_tris.len() as i16);
		for (indices, texture) in self.colored_tris.iter() {
			indices.iter().for_each(|&i| w16(out, i));
			w16(out, *texture);
		}
	}
}

#[derive(Clone, Debug)]
pub struct FrameDef {
	pub translation: [i16; 3],
	/// Counted frames store single-axis codes as triples
	pub rotations: Vec<FrameRotation>,
	/// Zero words after the rotations of fixed-stride frames
	pub padding: usize,
}

impl FrameDef {
	fn header(&self) -> Vec<u16> {
		let mut words = vec![0xFFF6, 10, 0xFFF6, 10, 0xFFF6, 10];
		words.extend(self.translation.map(|t| t as u16));
		words
	}

	/// Angle-set count then swapped pairs.
	fn counted(&self) -> Vec<u16> {
		let mut words = self.header();
		words.push(self.rotations.len() as u16);
		for &r in self.rotations.iter() {
			let [a, b] = euler_words(triple(r));
			words.extend([b, a]);
		}
		words
	}

	fn canonical(&self) -> Vec<u16> {
		let mut words = self.header();
		words.extend(self.rotations.iter().flat_map(|&r| rotation_words(r)));
		words.extend(vec![0; self.padding]);
		words
	}
}

#[derive(Clone, Debug)]
pub struct AnimDef {
	pub frame_rate: u8,
	pub first_tick: u16,
	pub last_tick: u16,
	pub frames: Vec<FrameDef>,
	pub next_animation: u16,
	/// Count and offset
	pub state_changes: (u16, u16),
	/// Count and word offset
	pub commands: (u16, u16),
	/// Overrides the computed frame byte offset
	pub frame_byte_offset: Option<u32>,
	/// Overrides the fixed stride, the first frame's length by default
	pub frame_size: Option<u8>,
}

#[derive(Clone, Debug)]
pub struct ModelDef {
	pub id: u32,
	pub first_mesh: u16,
	/// Opcode and offset for each node after the root
	pub bones: Vec<(u32, [i32; 3])>,
	pub animation: Option<u16>,
}

#[derive(Clone, Copy, Debug)]
pub struct SpriteDef {
	pub page: u16,
	pub x: u8,
	pub y: u8,
	pub width: u16,
	pub height: u16,
	pub left: i16,
	pub top: i16,
	pub right: i16,
	pub bottom: i16,
}

impl SpriteDef {
	pub const SAMPLE: SpriteDef = SpriteDef { page: 0, x: 10, y: 20, width: 256, height: 256, left: -50, top: 100, right: 50, bottom: 0 };
}

#[derive(Clone, Copy, Debug)]
pub struct LightDef {
	pub pos: [i32; 3],
	pub intensity: i16,
	pub falloff: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct StaticPlacement {
	pub pos: [i32; 3],
	pub rotation: u16,
	pub lighting: u16,
	pub id: u16,
}

#[derive(Clone, Debug, Default)]
pub struct RoomDef {
	pub x: i32,
	pub z: i32,
	pub y_bottom: i32,
	pub y_top: i32,
	/// Position and light
	pub vertices: Vec<([i16; 3], u16)>,
	pub quads: Vec<([u16; 4], u16)>,
	pub tris: Vec<([u16; 3], u16)>,
	/// Vertex and sprite
	pub sprites: Vec<(u16, u16)>,
	pub ambient: i16,
	pub light_mode: u16,
	pub lights: Vec<LightDef>,
	pub static_meshes: Vec<StaticPlacement>,
	pub alternate_room: i16,
	pub flags: u16,
}

impl RoomDef {
	fn write(&self, out: &mut Vec<u8>, version: Version) {
		let layout = version.layout();
		let dual = layout.dual_lighting;
		[self.x, self.z, self.y_bottom, self.y_top].into_iter().for_each(|v| wi32(out, v));
		let data = &mut vec![];
		w16(data, self.vertices.len() as u16);
		for (pos, light) in self.vertices.iter() {
			pos.iter().for_each(|&c| wi16(data, c));
			w16(data, *light);
			if dual {
				w16(data, 0);//attributes
				w16(data, *light);
			}
		}
		w16(data, self.quads.len() as u16);
		for (indices, texture) in self.quads.iter() {
			indices.iter().for_each(|&i| w16(data, i));
			w16(data, *texture);
		}
		w16(data, self.tris.len() as u16);
		for (indices, texture) in self.tris.iter() {
			indices.iter().for_each(|&i| w16(data, i));
			w16(data, *texture);
		}
		w16(data, self.sprites.len() as u16);
		for &(vertex, sprite) in self.sprites.iter() {
			w16(data, vertex);
			w16(data, sprite);
		}
		wlen(out, data.len() / 2);
		out.extend(data.iter());
		w16(out, 1);//portals
		out.extend([0xEE; 32]);
		w16(out, 2);//z sectors
		w16(out, 1);//x sectors
		out.extend([0xEE; 16]);
		wi16(out, self.ambient);
		if layout.extended_ambient {
			wi16(out, self.ambient);
			w16(out, self.light_mode);
		}
		w16(out, self.lights.len() as u16);
		for light in self.lights.iter() {
			light.pos.iter().for_each(|&c| wi32(out, c));
			wi16(out, light.intensity);
			if dual {
				wi16(out, light.intensity);
			}
			wi32(out, light.falloff);
			if dual {
				wi32(out, light.falloff);
			}
		}
		w16(out, self.static_meshes.len() as u16);
		for placement in self.static_meshes.iter() {
			placement.pos.iter().for_each(|&c| wi32(out, c));
			w16(out, placement.rotation);
			w16(out, placement.lighting);
			if dual {
				w16(out, placement.lighting);
			}
			w16(out, placement.id);
		}
		wi16(out, self.alternate_room);
		w16(out, self.flags);
	}
}

#[derive(Clone, Copy, Debug)]
pub struct ObjectDef {
	pub id: u16,
	pub room: u16,
	pub pos: [i32; 3],
	pub rotation: u16,
	pub intensity: u16,
}

impl ObjectDef {
	pub fn new(id: u16) -> Self {
		Self { id, room: 0, pos: [0; 3], rotation: 0, intensity: 0 }
	}
}

/// Every section the decoders read, the rest are written empty.
#[derive(Clone, Debug, Default)]
pub struct LevelBuilder {
	pub palette: Vec<[u8; 3]>,
	/// 8-bit index and 16-bit color filling each page
	pub texpages: Vec<(u8, u16)>,
	/// Alpha mode, page and whole-pixel corners
	pub texinfos: Vec<(u16, u16, [[u8; 2]; 4])>,
	pub texanim_chains: Vec<Vec<u16>>,
	pub meshes: Vec<MeshDef>,
	pub animations: Vec<AnimDef>,
	/// State id, range count and offset
	pub state_changes: Vec<(u16, u16, u16)>,
	/// First tick, last tick, next animation, next tick
	pub anim_ranges: Vec<[u16; 4]>,
	pub anim_commands: Vec<u16>,
	pub models: Vec<ModelDef>,
	/// Id, mesh, visibility half extents
	pub static_meshes: Vec<(u32, u16, [i16; 3])>,
	pub sprites: Vec<SpriteDef>,
	/// Id, negative length, first sprite
	pub sequences: Vec<(i32, i16, u16)>,
	pub rooms: Vec<RoomDef>,
	pub objects: Vec<ObjectDef>,
}

impl LevelBuilder {
	fn write_palette(&self, out: &mut Vec<u8>) {
		for index in 0..256 {
			out.extend(self.palette.get(index).copied().unwrap_or_default());
		}
	}

	fn write_meshes(&self, out: &mut Vec<u8>) {
		let data = &mut vec![];
		let mut pointers = vec![];
		for mesh in self.meshes.iter() {
			pointers.push(data.len() as u32);
			mesh.write(data);
		}
		wlen(out, data.len() / 2);
		out.extend(data.iter());
		wlen(out, pointers.len());
		pointers.into_iter().for_each(|p| w32(out, p));
	}

	/// Animation headers and raw frame words.
	fn encode_animations(&self, version: Version) -> (Vec<u8>, Vec<u16>) {
		let fixed = version.layout().fixed_frame_stride;
		let mut headers: Vec<u8> = vec![];
		let mut frames: Vec<u16> = vec![];
		for anim in self.animations.iter() {
			let byte_offset = anim.frame_byte_offset.unwrap_or(frames.len() as u32 * 2);
			let stride = anim.frames.first().map(|f| f.canonical().len()).unwrap_or(0);
			let frame_size = match fixed {
				true => anim.frame_size.unwrap_or(stride as u8),
				false => 0,
			};
			for frame in anim.frames.iter() {
				frames.extend(match fixed {
					true => frame.canonical(),
					false => frame.counted(),
				});
			}
			let out = &mut headers;
			w32(out, byte_offset);
			out.push(anim.frame_rate);
			out.push(frame_size);
			w16(out, 0);//state id
			out.extend([0; 8]);
			w16(out, anim.first_tick);
			w16(out, anim.last_tick);
			w16(out, anim.next_animation);
			w16(out, anim.first_tick);
			[anim.state_changes, anim.commands].into_iter().for_each(|(count, offset)| {
				w16(out, count);
				w16(out, offset);
			});
		}
		(headers, frames)
	}

	fn write_models(&self, out: &mut Vec<u8>, frames: Vec<u16>) {
		let mut bones: Vec<u32> = vec![];
		let mut headers: Vec<u8> = vec![];
		for model in self.models.iter() {
			let bone_offset = bones.len() as u32;
			for (op, offset) in model.bones.iter() {
				bones.push(*op);
				bones.extend(offset.map(|c| c as u32));
			}
			w32(&mut headers, model.id);
			w16(&mut headers, model.bones.len() as u16 + 1);
			w16(&mut headers, model.first_mesh);
			w32(&mut headers, bone_offset);
			w32(&mut headers, 0);//frame byte offset
			w16(&mut headers, model.animation.unwrap_or(0xFFFF));
		}
		wlen(out, bones.len());
		bones.into_iter().for_each(|b| w32(out, b));
		wlen(out, frames.len());
		frames.into_iter().for_each(|f| w16(out, f));
		wlen(out, self.models.len());
		out.extend(headers);
	}

	pub fn build(&self, version: Version) -> Vec<u8> {
		let layout = version.layout();
		let out = &mut vec![];
		w32(out, layout.magic);
		if layout.leading_palettes {
			self.write_palette(out);
			out.extend(vec![0; 256 * 4]);
		}
		wlen(out, self.texpages.len());
		for &(index, _) in self.texpages.iter() {
			out.extend(vec![index; NUM_PIXELS]);
		}
		if layout.texpages16 {
			for &(_, color) in self.texpages.iter() {
				for _ in 0..NUM_PIXELS {
					w16(out, color);
				}
			}
		}
		w32(out, 0);//unused
		w16(out, self.rooms.len() as u16);
		for room in self.rooms.iter() {
			room.write(out, version);
		}
		w32(out, 0);//floor data
		self.write_meshes(out);
		let (anim_headers, frames) = self.encode_animations(version);
		wlen(out, self.animations.len());
		out.extend(anim_headers);
		wlen(out, self.state_changes.len());
		for &(state_id, count, offset) in self.state_changes.iter() {
			[state_id, count, offset].into_iter().for_each(|v| w16(out, v));
		}
		wlen(out, self.anim_ranges.len());
		self.anim_ranges.iter().flatten().for_each(|&v| w16(out, v));
		wlen(out, self.anim_commands.len());
		self.anim_commands.iter().for_each(|&c| w16(out, c));
		self.write_models(out, frames);
		wlen(out, self.static_meshes.len());
		for &(id, mesh, [x, y, z]) in self.static_meshes.iter() {
			w32(out, id);
			w16(out, mesh);
			for _ in 0..2 {
				[-x, x, -y, y, -z, z].into_iter().for_each(|c| wi16(out, c));
			}
			w16(out, 0);//flags
		}
		wlen(out, self.texinfos.len());
		for &(alpha_mode, page, corners) in self.texinfos.iter() {
			w16(out, alpha_mode);
			w16(out, page);
			for [x, y] in corners {
				out.extend([0x80, x, 0x80, y]);
			}
		}
		wlen(out, self.sprites.len());
		for s in self.sprites.iter() {
			w16(out, s.page);
			out.extend([s.x, s.y]);
			w16(out, s.width);
			w16(out, s.height);
			[s.left, s.top, s.right, s.bottom].into_iter().for_each(|v| wi16(out, v));
		}
		wlen(out, self.sequences.len());
		for &(id, neg_length, first) in self.sequences.iter() {
			wi32(out, id);
			wi16(out, neg_length);
			w16(out, first);
		}
		w32(out, 0);//cameras
		w32(out, 0);//sound sources
		w32(out, 0);//boxes
		w32(out, 0);//overlaps
		let mut chains = vec![];
		if !self.texanim_chains.is_empty() {
			chains.push(self.texanim_chains.len() as u16);
			for chain in self.texanim_chains.iter() {
				chains.push(chain.len() as u16 - 1);
				chains.extend(chain);
			}
		}
		wlen(out, chains.len());
		chains.into_iter().for_each(|c| w16(out, c));
		wlen(out, self.objects.len());
		for object in self.objects.iter() {
			w16(out, object.id);
			w16(out, object.room);
			object.pos.iter().for_each(|&c| wi32(out, c));
			w16(out, object.rotation);
			w16(out, object.intensity);
			if layout.dual_lighting {
				w16(out, object.intensity);
			}
			w16(out, 0);//flags
		}
		out.extend(vec![0; 32 * 256]);//light map
		if !layout.leading_palettes {
			self.write_palette(out);
		}
		w16(out, 0);//cinematic frames
		w16(out, 0);//demo data
		out.extend(vec![0; layout.sound_map_len as usize * 2]);
		w32(out, 0);//sound details
		if layout.embedded_samples {
			w32(out, 0);
		}
		w32(out, 0);//sample indices
		std::mem::take(out)
	}
}

fn frame(y: i16, turn: u16) -> FrameDef {
	FrameDef {
		translation: [0, y, 0],
		rotations: [U16Vec3::new(0, turn, 0), U16Vec3::new(turn, 0, 0), U16Vec3::ZERO].map(FrameRotation::All).to_vec(),
		padding: 0,
	}
}

/// Two rooms, three meshes, an animated and a static model, sprites and placed objects.
pub fn sample_builder() -> LevelBuilder {
	let corners = [[0, 0], [63, 0], [63, 31], [0, 31]];
	let quad_vertices = vec![([0, 0, 0], 0), ([1024, -256, 0], 4096), ([1024, 0, 1024], 0), ([0, 0, 1024], 0)];
	LevelBuilder {
		palette: vec![[0, 0, 0], [63, 0, 0], [0, 32, 1]],
		texpages: vec![(1, 0xFC00)],
		texinfos: vec![(0, 0, corners); 5],
		texanim_chains: vec![vec![0, 1, 2], vec![3]],
		meshes: vec![
			MeshDef {
				textured_quads: vec![([0, 1, 2, 3], 0x8000 | 4)],
				colored_tris: vec![([0, 1, 2], 0x0305)],
				radius: 300,
				..MeshDef::lit(4)
			},
			MeshDef { normals: true, ..MeshDef::lit(3) },
			MeshDef::lit(3),
		],
		animations: vec![
			AnimDef {
				frame_rate: 1,
				first_tick: 0,
				last_tick: 2,
				frames: vec![frame(0, 0), frame(10, 256), frame(20, 512)],
				next_animation: 1,
				state_changes: (1, 0),
				commands: (2, 0),
				frame_byte_offset: None,
				frame_size: None,
			},
			AnimDef {
				frame_rate: 2,
				first_tick: 3,
				last_tick: 4,
				frames: vec![frame(5, 128)],
				next_animation: 0,
				state_changes: (0, 0),
				commands: (0, 0),
				frame_byte_offset: None,
				frame_size: None,
			},
		],
		state_changes: vec![(2, 2, 0)],
		anim_ranges: vec![[0, 1, 1, 3], [2, 2, 0, 0]],
		anim_commands: vec![5, 3, 0],
		models: vec![
			ModelDef { id: 7, first_mesh: 0, bones: vec![(2, [0, 100, 0]), (1, [50, 0, 0])], animation: Some(0) },
			ModelDef { id: 8, first_mesh: 2, bones: vec![], animation: None },
		],
		static_meshes: vec![(20, 0, [1, 2, 3]), (21, 1, [1, 1, 1])],
		sprites: vec![SpriteDef::SAMPLE, SpriteDef { x: 0, y: 0, ..SpriteDef::SAMPLE }],
		sequences: vec![(30, -2, 0)],
		rooms: vec![
			RoomDef {
				x: 1024,
				z: 2048,
				y_bottom: 0,
				y_top: -1024,
				vertices: quad_vertices.clone(),
				quads: vec![([0, 1, 2, 3], 0)],
				tris: vec![([0, 1, 2], 4)],
				sprites: vec![(0, 1)],
				light_mode: 2,
				lights: vec![
					LightDef { pos: [0, -512, 0], intensity: 0, falloff: 4096 },
					LightDef { pos: [512, -512, 0], intensity: -100, falloff: 1000 },
				],
				static_meshes: vec![
					StaticPlacement { pos: [100, 0, 200], rotation: 0x4000, lighting: 0, id: 20 },
					StaticPlacement { pos: [0, 0, 0], rotation: 0, lighting: 0, id: 21 },
				],
				alternate_room: -1,
				..Default::default()
			},
			RoomDef {
				vertices: quad_vertices,
				quads: vec![([0, 1, 2, 3], 4)],
				light_mode: 2,
				alternate_room: 0,
				..Default::default()
			},
		],
		objects: vec![
			ObjectDef { pos: [512, 0, 1024], rotation: 0x8000, intensity: 0xFFFF, ..ObjectDef::new(7) },
			ObjectDef { room: 1, pos: [10, 20, 30], ..ObjectDef::new(30) },
			ObjectDef { intensity: 8191, ..ObjectDef::new(8) },
		],
	}
}

pub fn sample_level(version: Version) -> Level {
	Level::from_bytes(&sample_builder().build(version), version).unwrap()
}

#[cfg(test)]
mod tests {
	use tr_reader::Directory;
	use super::*;

	#[test]
	fn sample_scans_to_end() {
		for version in [Version::V1, Version::V2] {
			let data = sample_builder().build(version);
			let dir = Directory::scan(&data, version.layout()).unwrap();
			assert_eq!(dir.end, data.len() as u64);
			assert_eq!(dir.rooms.count, 2);
			assert_eq!(dir.animations.count, 2);
		}
	}

	#[test]
	fn euler_words_round_trip_through_decode() {
		let angles = U16Vec3::new(1, 1000, 513);
		let words = euler_words(angles);
		let decoded = tr_reader::model::FrameRotation::decode(&words);
		assert_eq!(decoded, Some((tr_reader::model::FrameRotation::All(angles), 2)));
	}
}
