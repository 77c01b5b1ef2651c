//! Greenroom Access — the access decision evaluator and the audited
//! access service built on top of it.
//!
//! The evaluator combines two layers of stored configuration: role-level
//! defaults and per-user overrides, plus contextual conditions (IP
//! allowlist, time-of-day window, expiry). It is fail-closed: anything
//! uncertain resolves to a denial.

pub mod decision;
pub mod evaluator;
pub mod service;

pub use decision::{AccessDecision, DecisionReason};
pub use evaluator::AccessEvaluator;
pub use service::AccessService;
