use log::debug;
use tr_reader::model::{self as tr, ReadVersioned};
use crate::{
	anim::Playback,
	error::resolve,
	level::{ModelId, ModelObject, RoomId, SequenceId, SpriteObject},
	light::object_intensity,
	LoadError,
};
use super::{quadrant_rotation, Loader};

impl<'a> Loader<'a> {
	fn model_object(&self, model: ModelId, room: RoomId, entity: &tr::Entity) -> ModelObject {
		let level = &self.level;
		let model_data = level.model(model);
		let playback = model_data.animation.map(|id| Playback::new(id, level.animation(id)));
		let mut object = ModelObject {
			model,
			room,
			transform: quadrant_rotation(entity.pos.as_vec3(), entity.rotation),
			light_intensity: object_intensity(entity.intensity),
			playback,
			node_transforms: Vec::with_capacity(model_data.nodes.len()),
		};
		object.update_node_transforms(model_data, &level.animations, &level.frames);
		object
	}

	/// Each object becomes a model object, a sprite object, both or neither, by type id.
	pub(super) fn load_objects(&mut self) -> Result<(), LoadError> {
		let reader = &mut self.dir.objects.reader(self.data);
		let num_rooms = self.level.rooms.len();
		for index in 0..self.dir.objects.count {
			let entity = tr::Entity::read_versioned(reader, self.layout)?;
			let room = RoomId(resolve("room", entity.room as usize, num_rooms)?);
			let model = self.level.models.iter().position(|m| m.id == entity.type_id as u32);
			let sequence = self.level.sprite_sequences.iter().position(|s| s.id == entity.type_id as i32);
			if let Some(model) = model {
				let object = self.model_object(ModelId(model), room, &entity);
				self.level.model_objects.push(object);
			}
			if let Some(sequence) = sequence {
				self.level.sprite_objects.push(SpriteObject {
					sequence: SequenceId(sequence),
					frame: 0,
					room,
					position: entity.pos.as_vec3(),
					light_intensity: object_intensity(entity.intensity),
				});
			}
			if model.is_none() && sequence.is_none() {
				debug!("object {} has type {} with no model or sprite sequence", index, entity.type_id);
			}
		}
		Ok(())
	}
}
