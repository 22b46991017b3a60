//! # safeguard-contracts
//!
//! Shared types and contracts for the safeguard deployment policy engine.
//!
//! All crates in the workspace import from here. No policy logic lives in
//! this crate, only the plan model, verdict/report types and error types.

pub mod error;
pub mod plan;
pub mod policy;
