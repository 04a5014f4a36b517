use glam::U16Vec3;

/// 1024 units per full turn
pub const ANGLE_MASK: u16 = 1023;

/// One bone's rotation code as stored in frame data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameRotation {
	X(u16),
	Y(u16),
	Z(u16),
	All(U16Vec3),
}

impl FrameRotation {
	/// Decodes the rotation at the front of `words`, returning it with the number of words used.
	/// `None` if `words` ends mid-rotation.
	pub fn decode(words: &[u16]) -> Option<(Self, usize)> {
		let &word = words.first()?;
		Some(match word >> 14 {
			0 => {
				let &word2 = words.get(1)?;
				let x = (word >> 4) & ANGLE_MASK;
				let y = ((word & 15) << 6) | (word2 >> 10);
				let z = word2 & ANGLE_MASK;
				(FrameRotation::All(U16Vec3::new(x, y, z)), 2)
			},
			1 => (FrameRotation::X(word & ANGLE_MASK), 1),
			2 => (FrameRotation::Y(word & ANGLE_MASK), 1),
			_ => (FrameRotation::Z(word & ANGLE_MASK), 1),
		})
	}
}
