//! `allowed-function-names`: deployed function names must match a pattern.
//!
//! Options are a pattern template (see [`crate::pattern`]) with `SERVICE`,
//! `STAGE` and `FUNCTION` in scope. `FUNCTION` is the name the user declared
//! for the resource; it is declared but unset when the resource does not map
//! back to a declared function.

use serde_json::Value;
use tracing::{debug, warn};

use safeguard_contracts::{
    error::{SafeguardError, SafeguardResult},
    plan::{Deployment, FUNCTION_RESOURCE_KIND},
    policy::{PolicyContext, Verdict},
};
use safeguard_core::{extract, Policy};

use super::function_label;
use crate::pattern;

pub struct AllowedFunctionNames;

impl Policy for AllowedFunctionNames {
    fn id(&self) -> &'static str {
        "allowed-function-names"
    }

    fn description(&self) -> &'static str {
        "Deployed function names must match a pattern built from service, stage and function name"
    }

    fn docs_url(&self) -> &'static str {
        docs_url!("allowed-function-names")
    }

    fn evaluate(&self, options: &Value, deployment: &Deployment) -> SafeguardResult<Verdict> {
        let template = options.as_str().ok_or_else(|| SafeguardError::InvalidOptions {
            policy_id: self.id().to_string(),
            reason: format!("expected a pattern string, got {options}"),
        })?;

        let mut failures = Vec::new();

        for record in extract(&deployment.plan, FUNCTION_RESOURCE_KIND)? {
            let declared = deployment.functions.declared_name(record.logical_name);
            if declared.is_none() {
                warn!(
                    resource = %record.logical_name,
                    "function resource has no declared function name; FUNCTION is unset"
                );
            }

            let context = PolicyContext::new()
                .with("SERVICE", deployment.service.as_str())
                .with("STAGE", deployment.stage.as_str())
                .with_optional("FUNCTION", declared);

            // Compiled per resource: FUNCTION differs for each one.
            let matcher = pattern::compile(template, &context)?;
            let deployed_name = record.required_str_property("FunctionName")?;

            if matcher.is_match(deployed_name) {
                debug!(resource = %record.logical_name, %deployed_name, "function name allowed");
            } else {
                failures.push(format!(
                    "Function \"{}\" doesn't match RegExp {}.",
                    function_label(deployment, &record),
                    matcher
                ));
            }
        }

        Ok(Verdict::from_failures(failures))
    }
}
