//! Connection lifecycle: status machine, backoff policy, room membership,
//! and the manager that owns the single live link.

pub mod backoff;
pub mod manager;
pub mod rooms;
pub mod state;
