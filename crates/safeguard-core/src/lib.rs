//! # safeguard-core
//!
//! The evaluation core of the safeguard deployment policy engine.
//!
//! This crate provides:
//! - The `Policy` trait every safeguard implements
//! - `PolicyRegistry`, the id → implementation lookup table
//! - `extract`, the plan resource walker policies build on
//! - `PolicyRunner`, which evaluates a configured policy list in order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use safeguard_core::{PolicyRegistry, PolicyRunner};
//!
//! let runner = PolicyRunner::new(registry);
//! let report = runner.run(&deployment, &configured)?;
//! ```

pub mod extract;
pub mod registry;
pub mod runner;
pub mod traits;

pub use extract::{extract, ResourceRecord};
pub use registry::PolicyRegistry;
pub use runner::PolicyRunner;
pub use traits::Policy;
