//! `allowed-regions`: the deployment region must be one of a fixed list.

use serde_json::Value;

use safeguard_contracts::{error::SafeguardResult, plan::Deployment, policy::Verdict};
use safeguard_core::Policy;

use super::string_list;

pub struct AllowedRegions;

impl Policy for AllowedRegions {
    fn id(&self) -> &'static str {
        "allowed-regions"
    }

    fn description(&self) -> &'static str {
        "Deployments are limited to the permitted provider regions"
    }

    fn docs_url(&self) -> &'static str {
        docs_url!("allowed-regions")
    }

    fn evaluate(&self, options: &Value, deployment: &Deployment) -> SafeguardResult<Verdict> {
        let allowed = string_list(self.id(), options)?;

        if allowed.iter().any(|r| *r == deployment.region) {
            return Ok(Verdict::Approved);
        }
        Ok(Verdict::Failed(vec![format!(
            "Region \"{}\" not in list of permitted regions: {}",
            deployment.region, options
        )]))
    }
}
