//! Safeguard configuration schema and loading.
//!
//! A `SafeguardConfig` is deserialized from TOML. It names the service being
//! deployed and lists the policies to run, in the order they should run.
//!
//! ```toml
//! [service]
//! name = "orders"
//! stage = "dev"
//! region = "eu-west-1"
//! functions = ["create-order", "list_orders"]
//!
//! [[policies]]
//! id = "allowed-function-names"
//! options = "${SERVICE}-${STAGE}-${FUNCTION}"
//!
//! [[policies]]
//! id = "allowed-runtimes"
//! options = ["nodejs20.x", "python3.12"]
//! enforcement_level = "warning"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use safeguard_contracts::{
    error::{SafeguardError, SafeguardResult},
    plan::{Deployment, DeploymentPlan, FunctionDeclaration},
    policy::ConfiguredPolicy,
};

fn default_region() -> String {
    "us-east-1".to_string()
}

/// The service metadata policies are evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name; substituted as `${SERVICE}`.
    pub name: String,

    /// Deployment stage; substituted as `${STAGE}`.
    pub stage: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Function names as declared in the service configuration. Their
    /// compiled logical ids follow the provider naming convention.
    #[serde(default)]
    pub functions: Vec<String>,
}

/// The top-level structure deserialized from a safeguard TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeguardConfig {
    pub service: ServiceConfig,

    /// Ordered policy list. Evaluated top to bottom.
    #[serde(default)]
    pub policies: Vec<ConfiguredPolicy>,
}

impl SafeguardConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `SafeguardError::ConfigError` if the TOML is malformed or does
    /// not match the expected schema.
    pub fn from_toml_str(s: &str) -> SafeguardResult<Self> {
        let config: SafeguardConfig = toml::from_str(s).map_err(|e| SafeguardError::ConfigError {
            reason: format!("failed to parse safeguard TOML: {}", e),
        })?;
        debug!(
            service = %config.service.name,
            stage = %config.service.stage,
            policies = config.policies.len(),
            "loaded safeguard configuration"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as safeguard configuration.
    pub fn from_file(path: &Path) -> SafeguardResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SafeguardError::ConfigError {
            reason: format!("failed to read safeguard file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Bundle the service metadata with a compiled `plan` for evaluation.
    pub fn deployment(&self, plan: DeploymentPlan) -> Deployment {
        Deployment {
            service: self.service.name.clone(),
            stage: self.service.stage.clone(),
            region: self.service.region.clone(),
            functions: FunctionDeclaration::from_names(self.service.functions.iter().cloned()),
            plan,
        }
    }
}

/// Read a compiled plan from a JSON file.
pub fn load_plan(path: &Path) -> SafeguardResult<DeploymentPlan> {
    let contents = std::fs::read_to_string(path).map_err(|e| SafeguardError::ConfigError {
        reason: format!("failed to read plan file '{}': {}", path.display(), e),
    })?;
    DeploymentPlan::from_json_str(&contents)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use safeguard_contracts::{
        error::SafeguardError,
        plan::DeploymentPlan,
        policy::EnforcementLevel,
    };

    use super::SafeguardConfig;

    const FULL: &str = r#"
        [service]
        name = "orders"
        stage = "prod"
        region = "eu-west-1"
        functions = ["create-order", "list_orders"]

        [[policies]]
        id = "allowed-function-names"
        options = "${SERVICE}-${STAGE}-${FUNCTION}"

        [[policies]]
        id = "allowed-runtimes"
        options = ["nodejs20.x", "python3.12"]
        enforcement_level = "warning"

        [[policies]]
        id = "require-dlq"
    "#;

    #[test]
    fn parses_service_and_ordered_policies() {
        let config = SafeguardConfig::from_toml_str(FULL).unwrap();

        assert_eq!(config.service.name, "orders");
        assert_eq!(config.service.region, "eu-west-1");

        let ids: Vec<&str> = config.policies.iter().map(|p| p.policy_id.as_str()).collect();
        assert_eq!(ids, vec!["allowed-function-names", "allowed-runtimes", "require-dlq"]);

        assert_eq!(config.policies[0].options, json!("${SERVICE}-${STAGE}-${FUNCTION}"));
        assert_eq!(config.policies[1].options, json!(["nodejs20.x", "python3.12"]));
        assert_eq!(config.policies[1].enforcement_level, EnforcementLevel::Warning);
        assert!(config.policies[2].options.is_null());
        assert_eq!(config.policies[2].enforcement_level, EnforcementLevel::Error);
    }

    #[test]
    fn region_and_policies_default() {
        let config = SafeguardConfig::from_toml_str(
            r#"
            [service]
            name = "svc"
            stage = "dev"
        "#,
        )
        .unwrap();

        assert_eq!(config.service.region, "us-east-1");
        assert!(config.service.functions.is_empty());
        assert!(config.policies.is_empty());
    }

    #[test]
    fn deployment_derives_function_logical_ids() {
        let config = SafeguardConfig::from_toml_str(FULL).unwrap();
        let deployment = config.deployment(DeploymentPlan::default());

        assert_eq!(deployment.service, "orders");
        assert_eq!(deployment.stage, "prod");
        assert_eq!(
            deployment.functions.declared_name("CreateDashorderLambdaFunction"),
            Some("create-order")
        );
        assert_eq!(
            deployment.functions.declared_name("List_ordersLambdaFunction"),
            None
        );
        assert_eq!(
            deployment.functions.declared_name("ListUnderscoreordersLambdaFunction"),
            Some("list_orders")
        );
    }

    #[test]
    fn missing_service_is_config_error() {
        let result = SafeguardConfig::from_toml_str(
            r#"
            [[policies]]
            id = "require-dlq"
        "#,
        );

        match result {
            Err(SafeguardError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse safeguard TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn bad_enforcement_level_is_config_error() {
        let result = SafeguardConfig::from_toml_str(
            r#"
            [service]
            name = "svc"
            stage = "dev"

            [[policies]]
            id = "require-dlq"
            enforcement_level = "fatal"
        "#,
        );
        assert!(matches!(result, Err(SafeguardError::ConfigError { .. })));
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = SafeguardConfig::from_file(std::path::Path::new("/nonexistent/safeguards.toml"));
        assert!(matches!(result, Err(SafeguardError::ConfigError { .. })));
    }
}
