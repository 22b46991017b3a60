//! The `Policy` trait: the seam between the runner and individual safeguards.
//!
//! A policy is a pure function of its configured options and the deployment
//! under evaluation. It never mutates the deployment, performs no I/O, and
//! returns exactly one `Verdict` per call.

use serde_json::Value;

use safeguard_contracts::{error::SafeguardResult, plan::Deployment, policy::Verdict};

/// A named deployment safeguard.
///
/// Implementations must be deterministic. Returning `Ok(Verdict::Failed(..))`
/// means the deployment violates the policy; returning `Err(..)` means the
/// policy could not be evaluated at all (bad options, malformed plan, a
/// pattern that does not compile). The runner never downgrades an `Err` to a
/// failed verdict.
pub trait Policy: Send + Sync {
    /// Registry key, e.g. `"allowed-function-names"`.
    fn id(&self) -> &'static str;

    /// One-line summary shown by listing front ends.
    fn description(&self) -> &'static str;

    /// Documentation link surfaced next to failure messages.
    fn docs_url(&self) -> &'static str;

    /// Evaluate `deployment` against this policy with the configured
    /// `options`.
    ///
    /// Every offending resource is reported; implementations must not stop
    /// at the first failure.
    fn evaluate(&self, options: &Value, deployment: &Deployment) -> SafeguardResult<Verdict>;
}
