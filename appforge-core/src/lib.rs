//! AppForge Core
//!
//! Core types shared by the AppForge client crates.
//!
//! This crate contains:
//! - Domain types: the generation request, jobs and their lifecycle state
//! - DTOs: request/response bodies of the generation service API

pub mod domain;
pub mod dto;
