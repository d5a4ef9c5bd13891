pub mod map;

pub use map::{MapLoaderError, TiledJsonMapLoader};
