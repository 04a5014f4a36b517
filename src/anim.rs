use std::{f32::consts::TAU, ops::Range};
use glam::{vec3, Mat4, Quat, U16Vec3, Vec3};
use log::trace;
use shared::{MinMax, ScalarMinMax};
use tr_reader::{model::FrameRotation, FormatError};
use crate::level::{Animation, AnimationId, Level, Model, ModelNode, ModelObject};

pub const TICK_RATE: f32 = 30.0;
pub const TICK_TIME: f32 = 1.0 / TICK_RATE;
/// Radians per stored angle unit
pub const ANGLE_UNIT: f32 = TAU / 1024.0;
/// Bounding box and translation
const FRAME_HEADER_WORDS: usize = 9;

fn rotation_quat(rotation: FrameRotation) -> Quat {
	let angle = |a: u16| a as f32 * ANGLE_UNIT;
	match rotation {
		FrameRotation::X(x) => Quat::from_rotation_x(angle(x)),
		FrameRotation::Y(y) => Quat::from_rotation_y(angle(y)),
		FrameRotation::Z(z) => Quat::from_rotation_z(angle(z)),
		FrameRotation::All(U16Vec3 { x, y, z }) =>
			Quat::from_rotation_y(angle(y)) *
			Quat::from_rotation_x(angle(x)) *
			Quat::from_rotation_z(angle(z)),
	}
}

/// One canonical frame record, decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
	pub bounds: MinMax<Vec3>,
	pub translation: Vec3,
	/// One per model node
	pub rotations: Vec<Quat>,
}

impl Keyframe {
	/// Decodes the words following a record's length word, one rotation per node.
	/// Words after the last node's rotation are ignored.
	pub fn decode(body: &[u16], num_nodes: usize) -> Result<Self, FormatError> {
		if body.len() < FRAME_HEADER_WORDS {
			return Err(FormatError::Inconsistent(format!("frame record of {} words is shorter than its header", body.len())));
		}
		let w = |i: usize| body[i] as i16 as f32;
		let bounds = MinMax {
			min: vec3(w(0), w(2), w(4)),
			max: vec3(w(1), w(3), w(5)),
		};
		let translation = vec3(w(6), w(7), w(8));
		let mut rest = &body[FRAME_HEADER_WORDS..];
		let mut rotations = Vec::with_capacity(num_nodes);
		for node in 0..num_nodes {
			let (rotation, used) = FrameRotation::decode(rest).ok_or_else(|| {
				FormatError::Inconsistent(format!("rotation of node {} overruns a frame record of {} words", node, body.len()))
			})?;
			rotations.push(rotation_quat(rotation));
			rest = &rest[used..];
		}
		if !rest.is_empty() {
			trace!("{} words after the last rotation", rest.len());
		}
		Ok(Keyframe { bounds, translation, rotations })
	}
}

/// Frame records of every animation, `[length][body]` where length counts the body words.
/// Rotations are only decoded per model, see `decode_keyframes`.
#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
	words: Vec<u16>,
	/// Word offset of each record, ascending
	starts: Vec<usize>,
}

impl FrameBuffer {
	pub fn words(&self) -> &[u16] {
		&self.words
	}

	fn push_record<I: IntoIterator<Item = u16>>(&mut self, body: I) -> Result<(), FormatError> {
		let start = self.words.len();
		self.words.push(0);
		self.words.extend(body);
		let len = self.words.len() - start - 1;
		match u16::try_from(len) {
			Ok(word) if len >= FRAME_HEADER_WORDS => {
				self.words[start] = word;
				self.starts.push(start);
				Ok(())
			},
			_ => {
				self.words.truncate(start);
				Err(FormatError::Inconsistent(format!("frame record of {} words", len)))
			},
		}
	}

	/// Normalizes one frame with its own angle-set count, each set two words in swapped order.
	/// Returns the raw offset of the next frame.
	pub fn push_counted(&mut self, raw: &[u16], offset: usize) -> Result<usize, FormatError> {
		let header = raw.get(offset..offset + FRAME_HEADER_WORDS + 1).ok_or_else(|| past_end(offset))?;
		let num_sets = header[FRAME_HEADER_WORDS] as usize;
		let sets_start = offset + FRAME_HEADER_WORDS + 1;
		let end = sets_start + num_sets * 2;
		let sets = raw.get(sets_start..end).ok_or_else(|| past_end(offset))?;
		let body = header[..FRAME_HEADER_WORDS]
			.iter()
			.copied()
			.chain(sets.chunks_exact(2).flat_map(|set| [set[1], set[0]]));
		self.push_record(body)?;
		Ok(end)
	}

	/// Normalizes one frame of `stride` words. Returns the raw offset of the next frame.
	pub fn push_fixed(&mut self, raw: &[u16], offset: usize, stride: usize) -> Result<usize, FormatError> {
		let body = raw.get(offset..offset + stride).ok_or_else(|| past_end(offset))?;
		self.push_record(body.iter().copied())?;
		Ok(offset + stride)
	}

	pub(crate) fn num_records(&self) -> usize {
		self.starts.len()
	}

	/// Word offset of the record following the one at `offset`.
	pub fn record_after(&self, offset: usize) -> usize {
		offset + self.words[offset] as usize + 1
	}

	/// Index of the record starting at `offset`. Panics if no record starts there.
	pub fn record_index(&self, offset: usize) -> usize {
		match self.starts.binary_search(&offset) {
			Ok(index) => index,
			Err(_) => panic!("no frame record at word {} of {}", offset, self.words.len()),
		}
	}

	/// Decodes `records` for a model of `num_nodes` nodes.
	pub fn decode_keyframes(&self, records: Range<usize>, num_nodes: usize) -> Result<Vec<Keyframe>, FormatError> {
		self.starts[records]
			.iter()
			.map(|&start| {
				let len = self.words[start] as usize;
				Keyframe::decode(&self.words[start + 1..start + 1 + len], num_nodes)
			})
			.collect()
	}
}

fn past_end(offset: usize) -> FormatError {
	FormatError::Inconsistent(format!("frame at word {} runs past the frame data", offset))
}

/// Shortest-arc interpolation that returns the endpoints exactly.
pub fn slerp(a: Quat, b: Quat, t: f32) -> Quat {
	if t <= 0.0 || a == b {
		a
	} else if t >= 1.0 {
		b
	} else {
		a.slerp(b, t)
	}
}

/// Interpolated root translation and node rotations.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
	pub translation: Vec3,
	pub rotations: Vec<Quat>,
}

impl Pose {
	pub fn rest(num_nodes: usize) -> Self {
		Self { translation: Vec3::ZERO, rotations: vec![Quat::IDENTITY; num_nodes] }
	}
}

/// Playback cursor of one model instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playback {
	pub animation: AnimationId,
	/// Within the animation's tick range
	pub tick: u16,
	/// Seconds since `tick` began, below `TICK_TIME`
	pub time: f32,
}

impl Playback {
	pub fn new(animation: AnimationId, anim: &Animation) -> Self {
		Self { animation, tick: anim.first_tick, time: 0.0 }
	}

	pub fn advance(&mut self, dt: f32, anim: &Animation) {
		self.time += dt;
		while self.time >= TICK_TIME {
			self.time -= TICK_TIME;
			self.tick = match self.tick < anim.last_tick && anim.ticks().contains(self.tick) {
				true => self.tick + 1,
				false => anim.first_tick,
			};
		}
	}

	/// Blends the frame pair around the cursor. `keyframes` are the animation's records decoded
	/// for the sampled model. Panics if the walk leaves the animation's records.
	pub fn sample(&self, anim: &Animation, frames: &FrameBuffer, keyframes: &[Keyframe]) -> Pose {
		let tpf = anim.ticks_per_frame.max(1);
		let elapsed = self.tick.saturating_sub(anim.first_tick);
		let frame = elapsed / tpf;
		let num_frames = anim.last_tick.saturating_sub(anim.first_tick) / tpf + 1;
		let mut offset = anim.frame_offset;
		for _ in 0..frame {
			offset = frames.record_after(offset);
		}
		let next = match frame + 1 >= num_frames {
			true => anim.frame_offset,
			false => frames.record_after(offset),
		};
		let index = |offset: usize| frames.record_index(offset) - anim.keyframes.start;
		let (kf0, kf1) = (&keyframes[index(offset)], &keyframes[index(next)]);
		let t = ((elapsed % tpf) as f32 + self.time * TICK_RATE) / tpf as f32;
		Pose {
			translation: kf0.translation.lerp(kf1.translation, t),
			rotations: kf0.rotations.iter().zip(kf1.rotations.iter()).map(|(&a, &b)| slerp(a, b, t)).collect(),
		}
	}
}

/// Root is `T(translation) * R(q0)`, every other node `parent * T(offset) * R(q)`.
pub fn compose(nodes: &[ModelNode], pose: &Pose, out: &mut Vec<Mat4>) {
	out.clear();
	for (index, node) in nodes.iter().enumerate() {
		let base = match node.parent {
			Some(parent) => out[parent],
			None => Mat4::from_translation(pose.translation),
		};
		let rotation = pose.rotations.get(index).copied().unwrap_or(Quat::IDENTITY);
		out.push(base * Mat4::from_translation(node.offset) * Mat4::from_quat(rotation));
	}
}

impl ModelObject {
	pub(crate) fn pose(&self, model: &Model, animations: &[Animation], frames: &FrameBuffer) -> Pose {
		match &self.playback {
			Some(playback) => playback.sample(&animations[playback.animation.index()], frames, &model.keyframes),
			None => Pose::rest(model.nodes.len()),
		}
	}

	pub fn update_node_transforms(&mut self, model: &Model, animations: &[Animation], frames: &FrameBuffer) {
		let pose = self.pose(model, animations, frames);
		compose(&model.nodes, &pose, &mut self.node_transforms);
	}

	pub fn tick(&mut self, dt: f32, model: &Model, animations: &[Animation], frames: &FrameBuffer) {
		let Some(playback) = &mut self.playback else {
			return;
		};
		if dt <= 0.0 {
			return;
		}
		playback.advance(dt, &animations[playback.animation.index()]);
		trace!("model {} at tick {}", model.id, playback.tick);
		self.update_node_transforms(model, animations, frames);
	}
}

impl Level {
	/// Advances every model object by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		let Level { models, animations, frames, model_objects, .. } = self;
		for object in model_objects.iter_mut() {
			object.tick(dt, &models[object.model.index()], animations, frames);
		}
	}
}
