//! Core domain types
//!
//! This module contains the structures the job-lifecycle client reasons
//! about: the validated request, the job record and its lifecycle state.

pub mod job;
pub mod request;
