//! User presence derived from connection events.

pub mod status;
pub mod tracker;

pub use status::PresenceStatus;
pub use tracker::{OnlineUser, PresenceTracker};
