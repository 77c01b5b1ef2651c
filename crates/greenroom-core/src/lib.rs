//! Greenroom Core — domain models, error types, and repository traits
//! shared across the access-control crates.

pub mod error;
pub mod models;
pub mod repository;
