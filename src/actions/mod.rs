//! Mutations a card can trigger, and the delayed removal that follows a
//! confirmed deletion.

pub mod list_actions;
pub mod removal;

pub use list_actions::ListActions;
pub use removal::{RemovalCanceller, DEFAULT_REMOVAL_GRACE_MS};
