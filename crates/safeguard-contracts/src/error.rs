//! Engine error types for safeguard evaluation.
//!
//! Every variant here means "the engine could not run", never "a policy
//! said no". A policy rejecting a deployment is expressed as
//! `Verdict::Failed`, which is ordinary data inside a `PolicyReport`.

use thiserror::Error;

/// The unified error type for the safeguard engine.
#[derive(Debug, Error)]
pub enum SafeguardError {
    /// A policy pattern template could not be turned into a matcher.
    ///
    /// Raised for invalid regex syntax after substitution, references to
    /// variables the context does not declare, and malformed placeholders.
    #[error("pattern compile error in '{pattern}': {reason}")]
    PatternCompile { pattern: String, reason: String },

    /// The compiled deployment plan violates its structural contract.
    ///
    /// The engine cannot repair an invalid plan, so this is always fatal.
    #[error("malformed deployment plan at resource '{resource}': {reason}")]
    MalformedPlan { resource: String, reason: String },

    /// A configured policy id has no registered implementation.
    #[error("unknown policy '{policy_id}'")]
    UnknownPolicy { policy_id: String },

    /// The options value configured for a policy has the wrong shape.
    #[error("invalid options for policy '{policy_id}': {reason}")]
    InvalidOptions { policy_id: String, reason: String },

    /// A configuration document or input file is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the safeguard crates.
pub type SafeguardResult<T> = Result<T, SafeguardError>;
