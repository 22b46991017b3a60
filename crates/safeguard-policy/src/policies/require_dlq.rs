//! `require-dlq`: every function must have a dead letter queue target.
//!
//! Takes no options. A function passes when its `DeadLetterConfig` carries a
//! non-null `TargetArn`; the ARN may be an intrinsic reference, so only its
//! presence is checked.

use serde_json::Value;
use tracing::debug;

use safeguard_contracts::{
    error::{SafeguardError, SafeguardResult},
    plan::{Deployment, FUNCTION_RESOURCE_KIND},
    policy::Verdict,
};
use safeguard_core::{extract, Policy};

use super::function_label;

pub struct RequireDlq;

impl Policy for RequireDlq {
    fn id(&self) -> &'static str {
        "require-dlq"
    }

    fn description(&self) -> &'static str {
        "Functions must be configured with a dead letter queue"
    }

    fn docs_url(&self) -> &'static str {
        docs_url!("require-dlq")
    }

    fn evaluate(&self, options: &Value, deployment: &Deployment) -> SafeguardResult<Verdict> {
        if !options.is_null() {
            return Err(SafeguardError::InvalidOptions {
                policy_id: self.id().to_string(),
                reason: format!("takes no options, got {options}"),
            });
        }

        let mut failures = Vec::new();
        for record in extract(&deployment.plan, FUNCTION_RESOURCE_KIND)? {
            let has_target = record
                .properties
                .get("DeadLetterConfig")
                .and_then(|dlq| dlq.get("TargetArn"))
                .is_some_and(|arn| !arn.is_null());

            if has_target {
                debug!(resource = %record.logical_name, "dead letter queue configured");
            } else {
                failures.push(format!(
                    "Function \"{}\" doesn't have a Dead Letter Queue configured.",
                    function_label(deployment, &record)
                ));
            }
        }

        Ok(Verdict::from_failures(failures))
    }
}
