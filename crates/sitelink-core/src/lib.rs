//! # sitelink-core
//!
//! Core crate for SiteLink. Contains configuration schemas, typed
//! identifiers, domain event payloads, boundary collaborator traits,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other SiteLink crates.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
