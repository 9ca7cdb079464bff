pub mod index;

pub use index::{SpatialIndex, SpatialItem};
