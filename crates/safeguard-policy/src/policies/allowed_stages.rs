//! `allowed-stages`: the deployment stage must be one of a fixed list.

use serde_json::Value;

use safeguard_contracts::{error::SafeguardResult, plan::Deployment, policy::Verdict};
use safeguard_core::Policy;

use super::string_list;

pub struct AllowedStages;

impl Policy for AllowedStages {
    fn id(&self) -> &'static str {
        "allowed-stages"
    }

    fn description(&self) -> &'static str {
        "Deployments are limited to the permitted stage names"
    }

    fn docs_url(&self) -> &'static str {
        docs_url!("allowed-stages")
    }

    fn evaluate(&self, options: &Value, deployment: &Deployment) -> SafeguardResult<Verdict> {
        let allowed = string_list(self.id(), options)?;

        if allowed.iter().any(|s| *s == deployment.stage) {
            return Ok(Verdict::Approved);
        }
        Ok(Verdict::Failed(vec![format!(
            "Stage name \"{}\" not in list of permitted names: {}",
            deployment.stage, options
        )]))
    }
}
