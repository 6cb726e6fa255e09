//! Global notification stream.

pub mod stream;

pub use stream::NotificationStream;
