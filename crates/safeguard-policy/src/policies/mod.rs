//! Built-in deployment policies.
//!
//! Each submodule implements one safeguard. [`builtin_registry`] returns a
//! registry with all of them registered under their ids.

use serde_json::Value;

use safeguard_contracts::{
    error::{SafeguardError, SafeguardResult},
    plan::Deployment,
};
use safeguard_core::{PolicyRegistry, ResourceRecord};

macro_rules! docs_url {
    ($slug:literal) => {
        concat!(
            "https://github.com/serverless/enterprise-plugin/tree/master/src/lib/safeguards/policies#",
            $slug
        )
    };
}

pub mod allowed_function_names;
pub mod allowed_regions;
pub mod allowed_runtimes;
pub mod allowed_stages;
pub mod require_dlq;

pub use allowed_function_names::AllowedFunctionNames;
pub use allowed_regions::AllowedRegions;
pub use allowed_runtimes::AllowedRuntimes;
pub use allowed_stages::AllowedStages;
pub use require_dlq::RequireDlq;

/// A registry containing every built-in policy.
pub fn builtin_registry() -> PolicyRegistry {
    PolicyRegistry::new()
        .with(Box::new(AllowedFunctionNames))
        .with(Box::new(AllowedRegions))
        .with(Box::new(AllowedRuntimes))
        .with(Box::new(AllowedStages))
        .with(Box::new(RequireDlq))
}

/// Parse `options` as a list of strings.
fn string_list(policy_id: &str, options: &Value) -> SafeguardResult<Vec<String>> {
    let invalid = || SafeguardError::InvalidOptions {
        policy_id: policy_id.to_string(),
        reason: format!("expected a list of strings, got {options}"),
    };

    options
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

/// The name to show for a function resource: the declared name when the
/// resource maps back to one, the logical name otherwise.
fn function_label<'a>(deployment: &'a Deployment, record: &ResourceRecord<'a>) -> &'a str {
    deployment
        .functions
        .declared_name(record.logical_name)
        .unwrap_or(record.logical_name)
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{json, Value};

    use safeguard_contracts::plan::{Deployment, DeploymentPlan, FunctionDeclaration};

    pub(crate) const LAMBDA: &str = "AWS::Lambda::Function";

    /// A deployment of service `svc` to stage `dev` in `us-east-1`.
    pub(crate) fn deployment(functions: FunctionDeclaration, resources: Value) -> Deployment {
        Deployment {
            service: "svc".to_string(),
            stage: "dev".to_string(),
            region: "us-east-1".to_string(),
            functions,
            plan: DeploymentPlan::from_value(json!({ "Resources": resources })).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use safeguard_contracts::error::SafeguardError;

    use super::{builtin_registry, string_list};

    #[test]
    fn builtin_registry_lists_every_policy() {
        let registry = builtin_registry();
        let ids: Vec<&str> = registry.iter().map(|p| p.id()).collect();

        assert_eq!(
            ids,
            vec![
                "allowed-function-names",
                "allowed-regions",
                "allowed-runtimes",
                "allowed-stages",
                "require-dlq",
            ]
        );
        for policy in registry.iter() {
            assert!(policy.docs_url().starts_with("https://"));
            assert!(!policy.description().is_empty());
        }
    }

    #[test]
    fn string_list_rejects_other_shapes() {
        assert_eq!(
            string_list("p", &json!(["a", "b"])).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );

        for bad in [json!("a"), json!([1]), json!(null), json!({ "a": 1 })] {
            match string_list("p", &bad) {
                Err(SafeguardError::InvalidOptions { policy_id, .. }) => assert_eq!(policy_id, "p"),
                other => panic!("expected InvalidOptions for {bad}, got {:?}", other),
            }
        }
    }
}
