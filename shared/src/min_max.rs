use glam_traits::GVec;

/// Some volume defined by a minimum and maximum.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMax<T> {
	pub min: T,
	pub max: T,
}

impl<T: Copy> MinMax<T> {
	pub fn new(a: T) -> Self {
		Self { min: a, max: a }
	}
	
	pub fn map<U, F: Fn(T) -> U>(self, f: F) -> MinMax<U> {
		MinMax { min: f(self.min), max: f(self.max) }
	}
}

pub trait VecMinMax<V>: Sized {
	fn update(&mut self, v: V);
	fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Option<Self>;
}

impl<V: GVec> VecMinMax<V> for MinMax<V> {
	fn update(&mut self, v: V) {
		self.min = self.min.min(v);
		self.max = self.max.max(v);
	}
	
	fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Option<Self> {
		let mut iter = iter.into_iter();
		let mut min_max = Self::new(iter.next()?);
		for v in iter {
			min_max.update(v);
		}
		Some(min_max)
	}
}

pub trait ScalarMinMax<S> {
	fn update(&mut self, s: S);
	fn contains(&self, s: S) -> bool;
}

impl<S: Copy + Ord> ScalarMinMax<S> for MinMax<S> {
	fn update(&mut self, s: S) {
		self.min = self.min.min(s);
		self.max = self.max.max(s);
	}
	
	fn contains(&self, s: S) -> bool {
		self.min <= s && s <= self.max
	}
}
