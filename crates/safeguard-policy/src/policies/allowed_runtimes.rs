//! `allowed-runtimes`: every function must run on a permitted runtime.
//!
//! Options are a list of runtime identifiers. Functions without a `Runtime`
//! property (container image functions) are not checked.

use serde_json::Value;

use safeguard_contracts::{
    error::SafeguardResult,
    plan::{Deployment, FUNCTION_RESOURCE_KIND},
    policy::Verdict,
};
use safeguard_core::{extract, Policy};

use super::{function_label, string_list};

pub struct AllowedRuntimes;

impl Policy for AllowedRuntimes {
    fn id(&self) -> &'static str {
        "allowed-runtimes"
    }

    fn description(&self) -> &'static str {
        "Functions must use one of the permitted runtimes"
    }

    fn docs_url(&self) -> &'static str {
        docs_url!("allowed-runtimes")
    }

    fn evaluate(&self, options: &Value, deployment: &Deployment) -> SafeguardResult<Verdict> {
        let allowed = string_list(self.id(), options)?;
        let mut failures = Vec::new();

        for record in extract(&deployment.plan, FUNCTION_RESOURCE_KIND)? {
            let Some(runtime) = record.str_property("Runtime") else {
                continue;
            };
            if !allowed.iter().any(|a| a == runtime) {
                failures.push(format!(
                    "Runtime of function \"{}\" is \"{}\", not in list of permitted runtimes: {}",
                    function_label(deployment, &record),
                    runtime,
                    options
                ));
            }
        }

        Ok(Verdict::from_failures(failures))
    }
}
