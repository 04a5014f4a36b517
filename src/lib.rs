pub mod anim;
pub mod error;
pub mod level;
pub mod light;
pub mod load;
pub mod save_image;
pub mod texanim;
#[cfg(test)]
mod test_level;

pub use error::LoadError;
pub use level::*;
pub use texanim::{GeometryObserver, TextureAnimator};
pub use tr_reader::{FormatError, UnsupportedVersion, Version};
