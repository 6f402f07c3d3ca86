//! Data Transfer Objects for the generation service API
//!
//! These mirror the JSON bodies exchanged with the service. They are kept
//! lenient (optional fields) so that contract violations surface as typed
//! client errors instead of deserialization failures.

pub mod health;
pub mod job;
