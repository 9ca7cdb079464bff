pub mod manager;
pub mod selection;

pub use manager::{MarkerLifecycleManager, MarkerSnapshot, SyncPhase};
pub use selection::SelectionSlot;
