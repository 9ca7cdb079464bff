//! Explicit replacements for the app's implicit session and profile contexts

pub mod session;
pub mod user;

pub use session::{SessionContext, Subscription};
pub use user::{MemoryProfileStore, ProfileStore, UserProfile, UserProfileContext};
