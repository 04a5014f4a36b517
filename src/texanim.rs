use log::trace;
use crate::level::{Level, Mesh, RoomId};

/// Seconds between texture animation steps
pub const STEP_TIME: f32 = 0.1;

/// Told about every room whose geometry was changed so it can be uploaded again.
pub trait GeometryObserver {
	fn room_geometry_changed(&mut self, room: RoomId, geometry: &Mesh);
}

impl<F: FnMut(RoomId, &Mesh)> GeometryObserver for F {
	fn room_geometry_changed(&mut self, room: RoomId, geometry: &Mesh) {
		self(room, geometry)
	}
}

/// Moves room polygons along their texinfo animation chains.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextureAnimator {
	time: f32,
}

impl TextureAnimator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn tick<O: GeometryObserver>(&mut self, dt: f32, level: &mut Level, observer: &mut O) {
		self.time += dt;
		while self.time >= STEP_TIME {
			self.time -= STEP_TIME;
			step(level, observer);
		}
	}
}

/// Advances every chained room polygon once and notifies each changed room.
pub fn step<O: GeometryObserver>(level: &mut Level, observer: &mut O) {
	let Level { rooms, texinfos, .. } = level;
	for room in rooms.iter_mut() {
		let mut changed = false;
		for polygon in room.geometry.polygons.iter_mut() {
			if let Some(next) = texinfos[polygon.texinfo.index()].next {
				polygon.texinfo = next;
				changed = true;
			}
		}
		if changed {
			trace!("room {} texture animation step", room.id.index());
			observer.room_geometry_changed(room.id, &room.geometry);
		}
	}
}
