pub mod animation;
pub mod marker;

pub use animation::OrbitAnimation;
pub use marker::{escape_html, ProfileMarker};
