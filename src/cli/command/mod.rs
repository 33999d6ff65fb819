pub mod info;
pub mod map;

pub use info::info;
pub use map::map;
