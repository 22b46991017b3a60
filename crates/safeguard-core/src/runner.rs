//! The policy runner: sequential evaluation of configured safeguards.
//!
//! The runner enforces the evaluation model:
//!
//!   Resolve all ids → Evaluate in order → Collect entries → Report
//!
//! Every configured id is resolved against the registry before the first
//! policy runs, so a misconfigured policy list fails without evaluating
//! anything. Evaluation errors abort the run and no partial report escapes.

use tracing::{debug, info, warn};

use safeguard_contracts::{
    error::SafeguardResult,
    plan::Deployment,
    policy::{ConfiguredPolicy, PolicyReport, ReportEntry, Verdict},
};

use crate::{registry::PolicyRegistry, traits::Policy};

/// Drives a configured policy list against one deployment.
///
/// Owns the registry; one runner can evaluate any number of deployments.
#[derive(Debug)]
pub struct PolicyRunner {
    registry: PolicyRegistry,
}

impl PolicyRunner {
    pub fn new(registry: PolicyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// Evaluate `configured` against `deployment` in configuration order.
    ///
    /// # Errors
    ///
    /// - `UnknownPolicy` if any configured id is not registered. Raised
    ///   before any policy is evaluated.
    /// - Any error a policy returns (`PatternCompile`, `MalformedPlan`,
    ///   `InvalidOptions`) is propagated unchanged and aborts the run.
    ///
    /// A policy returning `Verdict::Failed` is NOT an error; it becomes a
    /// report entry and the run continues.
    pub fn run(
        &self,
        deployment: &Deployment,
        configured: &[ConfiguredPolicy],
    ) -> SafeguardResult<PolicyReport> {
        debug!(
            service = %deployment.service,
            stage = %deployment.stage,
            policies = configured.len(),
            functions = deployment.functions.len(),
            resources = deployment.plan.len(),
            "policy run starting"
        );

        // Resolve every id first; an unknown id must stop the run before any
        // configured policy is evaluated.
        let resolved: Vec<(&ConfiguredPolicy, &dyn Policy)> = configured
            .iter()
            .map(|cfg| self.registry.get(&cfg.policy_id).map(|policy| (cfg, policy)))
            .collect::<SafeguardResult<_>>()
            .inspect_err(|e| warn!(error = %e, "policy list references an unregistered policy"))?;

        let mut entries = Vec::with_capacity(resolved.len());
        for (cfg, policy) in resolved {
            let verdict = policy
                .evaluate(&cfg.options, deployment)
                .inspect_err(|e| warn!(policy_id = %cfg.policy_id, error = %e, "policy could not be evaluated"))?;
            // A failure with nothing to report is an approval.
            let verdict = match verdict {
                Verdict::Failed(messages) => Verdict::from_failures(messages),
                approved => approved,
            };

            if verdict.is_approved() {
                debug!(policy_id = %cfg.policy_id, "policy approved");
            } else {
                info!(
                    policy_id = %cfg.policy_id,
                    level = ?cfg.enforcement_level,
                    failures = verdict.messages().len(),
                    "policy failed"
                );
            }

            entries.push(ReportEntry {
                policy_id: cfg.policy_id.clone(),
                verdict,
                enforcement_level: cfg.enforcement_level,
                docs_url: policy.docs_url().to_string(),
            });
        }

        let report = PolicyReport { entries };
        debug!(
            approved = report.is_approved(),
            blocks_deployment = report.blocks_deployment(),
            "policy run complete"
        );
        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
