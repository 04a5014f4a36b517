/// Raw light values are 13-bit with 0 the brightest.
pub const MAX_RAW: f32 = 8191.0;

/// Value that marks an object as fully lit.
pub const FULLY_LIT: u16 = 0xFFFF;

pub fn intensity<T: Into<f32>>(raw: T) -> f32 {
	1.0 - raw.into() / MAX_RAW
}

/// Negative values clamp to dark, unlike every other light field.
pub fn room_light_intensity(raw: i16) -> f32 {
	match raw < 0 {
		true => 0.0,
		false => intensity(raw),
	}
}

pub fn object_intensity(raw: u16) -> f32 {
	match raw {
		FULLY_LIT => 1.0,
		raw => intensity(raw),
	}
}
