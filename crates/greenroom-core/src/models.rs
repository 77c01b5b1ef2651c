//! Domain models for Greenroom.
//!
//! These are the core types shared across all crates.

pub mod audit;
pub mod context;
pub mod grant;
pub mod role;
