//! Room-scoped update streams.
//!
//! A stream joins its room on open and leaves on close (or drop), keeping
//! a bounded, newest-first buffer of the room's events in between. The
//! buffer is a presentational cache; durability is the backend's job.

pub mod buffer;
pub mod conversation;
pub mod project;
pub mod typing;

pub use buffer::EventBuffer;
pub use conversation::ConversationStream;
pub use project::{ProjectEvent, ProjectStream};
pub use typing::TypingTracker;
