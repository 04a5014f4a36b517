use std::io::Cursor;
use glam::Vec3;
use log::debug;
use tr_reader::{model as tr, read_boxed_slice, Readable};
use crate::{error::resolve, level::{AnimationId, MeshId, Model, ModelNode}, LoadError};
use super::Loader;

/// Dwords per bone record
const BONE_DWORDS: u64 = 4;

impl<'a> Loader<'a> {
	/// Node parents come from a stack machine over one bone record per non-root node.
	fn build_nodes(&self, raw: &tr::Model, bones: &mut Cursor<&[u8]>) -> Result<Vec<ModelNode>, LoadError> {
		let num_meshes = self.level.meshes.len();
		let mut nodes = Vec::with_capacity(raw.num_meshes as usize);
		let mut stack = vec![];
		for index in 0..raw.num_meshes as usize {
			let mesh = MeshId(resolve("mesh", raw.first_mesh as usize + index, num_meshes)?);
			if index == 0 {
				nodes.push(ModelNode { parent: None, offset: Vec3::ZERO, mesh });
				continue;
			}
			bones.set_position((raw.bone_offset as u64 + (index as u64 - 1) * BONE_DWORDS) * 4);
			let bone = tr::MeshNode::read(bones)?;
			let mut parent = index - 1;
			if bone.details.pop() {
				parent = stack.pop().ok_or_else(|| {
					LoadError::inconsistent(format!("model {} node {} pops an empty parent stack", raw.id, index))
				})?;
			}
			if bone.details.push() {
				stack.push(parent);
			}
			nodes.push(ModelNode { parent: Some(parent), offset: bone.offset.as_vec3(), mesh });
		}
		Ok(nodes)
	}

	pub(super) fn load_models(&mut self) -> Result<(), LoadError> {
		let raw_models: Box<[tr::Model]> = read_boxed_slice(&mut self.dir.models.reader(self.data), self.dir.models.count as usize)?;
		let bones = &mut self.dir.bones.reader(self.data);
		for raw in raw_models.iter() {
			let nodes = self.build_nodes(raw, bones)?;
			let animation = raw
				.animation
				.map(|a| resolve("animation", a.get() as usize, self.level.animations.len()))
				.transpose()?
				.map(AnimationId);
			let keyframes = match animation {
				Some(animation) => {
					let records = self.level.animations[animation.index()].keyframes.clone();
					self.level.frames.decode_keyframes(records, nodes.len()).map_err(|e| {
						LoadError::inconsistent(format!("model {} animation {}: {}", raw.id, animation.index(), e))
					})?
				},
				None => vec![],
			};
			self.level.models.push(Model { id: raw.id, nodes, animation, keyframes });
		}
		debug!("{} models", self.level.models.len());
		Ok(())
	}
}
