use log::debug;
use tr_reader::{model as tr, read_boxed_slice, read_words};
use crate::{error::{resolve, resolve_range}, level::{Animation, AnimationId, AnimRange, StateChange}, LoadError};
use super::Loader;

impl<'a> Loader<'a> {
	pub(super) fn load_animations(&mut self) -> Result<(), LoadError> {
		let dir = &self.dir;
		let raw_frames = read_words(&mut dir.frames.reader(self.data), dir.frames.count as usize)?;
		self.level.anim_commands = read_words(&mut dir.anim_commands.reader(self.data), dir.anim_commands.count as usize)?;
		let anims: Box<[tr::Animation]> = read_boxed_slice(&mut dir.animations.reader(self.data), dir.animations.count as usize)?;
		let animation = |index: u16| resolve("animation", index as usize, anims.len()).map(AnimationId);
		let ranges: Box<[tr::AnimRange]> = read_boxed_slice(&mut dir.anim_ranges.reader(self.data), dir.anim_ranges.count as usize)?;
		self.level.anim_ranges = ranges
			.iter()
			.map(|r| -> Result<_, LoadError> {
				Ok(AnimRange {
					first_tick: r.first_tick,
					last_tick: r.last_tick,
					next_animation: animation(r.next_anim)?,
					next_tick: r.next_tick,
				})
			})
			.collect::<Result<_, _>>()?;
		let state_changes: Box<[tr::StateChange]> = read_boxed_slice(&mut dir.state_changes.reader(self.data), dir.state_changes.count as usize)?;
		let num_ranges = self.level.anim_ranges.len();
		self.level.state_changes = state_changes
			.iter()
			.map(|s| -> Result<_, LoadError> {
				Ok(StateChange {
					state_id: s.state_id,
					ranges: resolve_range("animation range", s.range_offset as usize, s.num_ranges as usize, num_ranges)?,
				})
			})
			.collect::<Result<_, _>>()?;
		let fixed_stride = self.layout.fixed_frame_stride;
		let mut raw_offset = 0;
		for (index, anim) in anims.iter().enumerate() {
			if anim.frame_byte_offset as usize != raw_offset * 2 {
				return Err(LoadError::inconsistent(format!(
					"animation {} frames start at byte {}, previous frames end at byte {}",
					index,
					anim.frame_byte_offset,
					raw_offset * 2,
				)));
			}
			if fixed_stride == (anim.frame_size == 0) {
				return Err(LoadError::inconsistent(format!("animation {} has frame size {}", index, anim.frame_size)));
			}
			let raw_end = match anims.get(index + 1) {
				Some(next) => next.frame_byte_offset as usize / 2,
				None => raw_frames.len(),
			};
			let frame_offset = self.level.frames.words().len();
			let first_record = self.level.frames.num_records();
			while raw_offset < raw_end {
				raw_offset = match fixed_stride {
					true => self.level.frames.push_fixed(&raw_frames, raw_offset, anim.frame_size as usize)?,
					false => self.level.frames.push_counted(&raw_frames, raw_offset)?,
				};
			}
			if raw_offset != raw_end {
				return Err(LoadError::inconsistent(format!(
					"animation {} frames end at word {}, next frames start at word {}",
					index,
					raw_offset,
					raw_end,
				)));
			}
			let state_changes = resolve_range(
				"state change",
				anim.state_change_offset as usize,
				anim.num_state_changes as usize,
				self.level.state_changes.len(),
			)?;
			//every command takes at least one word
			let commands = resolve_range(
				"animation command",
				anim.command_offset as usize,
				anim.num_commands as usize,
				self.level.anim_commands.len(),
			)?;
			self.level.animations.push(Animation {
				state_id: anim.state_id,
				ticks_per_frame: anim.frame_rate as u16,
				first_tick: anim.first_tick,
				last_tick: anim.last_tick,
				next_animation: animation(anim.next_anim)?,
				next_tick: anim.next_tick,
				frame_offset,
				keyframes: first_record..self.level.frames.num_records(),
				state_changes,
				command_offset: commands.start,
				num_commands: commands.len(),
			});
		}
		debug!("{} animations, {} frame records", self.level.animations.len(), self.level.frames.num_records());
		Ok(())
	}
}
