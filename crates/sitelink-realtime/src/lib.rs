//! # sitelink-realtime
//!
//! Real-time client engine for SiteLink. Provides:
//!
//! - A single authenticated connection with automatic backoff reconnection
//! - A typed event bus consumed through RAII subscription handles
//! - User presence tracking (online/away/busy/offline)
//! - Room-scoped project and conversation streams with bounded buffers
//! - A notification stream with unread counting and OS-level side effects
//! - A workflow alert stream with acknowledge/dismiss semantics
//!
//! The engine owns no persistence; every list it keeps is a presentational
//! cache over server truth.

pub mod bus;
pub mod connection;
pub mod event;
pub mod metrics;
pub mod notification;
pub mod presence;
pub mod room;
pub mod transport;
pub mod workflow;

pub use bus::{EventBus, Subscription};
pub use connection::manager::ConnectionManager;
pub use connection::state::ConnectionStatus;
pub use event::{EventKind, ServerEvent};
pub use notification::stream::NotificationStream;
pub use presence::tracker::PresenceTracker;
pub use room::conversation::ConversationStream;
pub use room::project::ProjectStream;
pub use workflow::alerts::WorkflowAlertStream;
