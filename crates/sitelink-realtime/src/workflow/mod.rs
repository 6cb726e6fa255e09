//! Global workflow alert stream.

pub mod alerts;

pub use alerts::WorkflowAlertStream;
