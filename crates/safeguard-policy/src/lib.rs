//! # safeguard-policy
//!
//! Built-in safeguards for compiled deployment plans, the template pattern
//! compiler they use, and TOML configuration loading.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use safeguard_core::PolicyRunner;
//! use safeguard_policy::{builtin_registry, config::{load_plan, SafeguardConfig}};
//!
//! let config = SafeguardConfig::from_file(Path::new("safeguards.toml"))?;
//! let deployment = config.deployment(load_plan(Path::new("plan.json"))?);
//! let report = PolicyRunner::new(builtin_registry()).run(&deployment, &config.policies)?;
//! ```
//!
//! ## Pattern templates
//!
//! `allowed-function-names` takes a regular expression with `${SERVICE}`,
//! `${STAGE}` and `${FUNCTION}` placeholders. Values are substituted as
//! literals and the result must match the deployed name in full.

pub mod config;
pub mod pattern;
pub mod policies;

pub use config::SafeguardConfig;
pub use pattern::{compile, Matcher};
pub use policies::builtin_registry;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use safeguard_contracts::{
        error::SafeguardError,
        plan::{Deployment, DeploymentPlan, FunctionDeclaration},
        policy::{ConfiguredPolicy, EnforcementLevel, Verdict},
    };
    use safeguard_core::PolicyRunner;

    use crate::{builtin_registry, SafeguardConfig};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// One function resource compiled as `my-func-dev`, declared as `myFunc`.
    fn single_function(deployed_name: &str) -> Deployment {
        Deployment {
            service: "svc".to_string(),
            stage: "dev".to_string(),
            region: "us-east-1".to_string(),
            functions: FunctionDeclaration::from_logical_ids([("myFunc", "my-func-dev")]),
            plan: DeploymentPlan::from_value(json!({
                "Resources": {
                    "my-func-dev": {
                        "Type": "AWS::Lambda::Function",
                        "Properties": { "FunctionName": deployed_name }
                    }
                }
            }))
            .unwrap(),
        }
    }

    fn naming(pattern: &str) -> ConfiguredPolicy {
        ConfiguredPolicy::new("allowed-function-names", json!(pattern))
    }

    // ── 1. matching deployed name ─────────────────────────────────────────────

    #[test]
    fn test_matching_name_approved() {
        let runner = PolicyRunner::new(builtin_registry());
        let report = runner
            .run(&single_function("svc-dev-myFunc"), &[naming("${SERVICE}-${STAGE}-.*")])
            .unwrap();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].verdict, Verdict::Approved);
        assert!(!report.blocks_deployment());
    }

    // ── 2. mismatching deployed name ──────────────────────────────────────────

    #[test]
    fn test_mismatching_name_failed() {
        let runner = PolicyRunner::new(builtin_registry());
        let report = runner
            .run(&single_function("wrong-name"), &[naming("${SERVICE}-${STAGE}-.*")])
            .unwrap();

        let entry = &report.entries[0];
        assert_eq!(entry.policy_id, "allowed-function-names");
        assert!(entry.docs_url.ends_with("#allowed-function-names"));
        match &entry.verdict {
            Verdict::Failed(messages) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].contains("myFunc"), "unexpected message: {}", messages[0]);
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(report.blocks_deployment());
    }

    // ── 3. one of two functions mismatches ────────────────────────────────────

    #[test]
    fn test_only_mismatching_function_named() {
        let deployment = Deployment {
            service: "svc".to_string(),
            stage: "dev".to_string(),
            region: "us-east-1".to_string(),
            functions: FunctionDeclaration::from_names(["first", "second"]),
            plan: DeploymentPlan::from_value(json!({
                "Resources": {
                    "FirstLambdaFunction": {
                        "Type": "AWS::Lambda::Function",
                        "Properties": { "FunctionName": "svc-dev-first" }
                    },
                    "SecondLambdaFunction": {
                        "Type": "AWS::Lambda::Function",
                        "Properties": { "FunctionName": "elsewhere-second" }
                    }
                }
            }))
            .unwrap(),
        };

        let runner = PolicyRunner::new(builtin_registry());
        let report = runner.run(&deployment, &[naming("${SERVICE}-${STAGE}-.*")]).unwrap();

        let messages = report.entries[0].verdict.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("second"));
        assert!(!messages[0].contains("first"));
    }

    // ── 4. undefined variable ─────────────────────────────────────────────────

    #[test]
    fn test_missing_variable_aborts_run() {
        let runner = PolicyRunner::new(builtin_registry());
        let result = runner.run(&single_function("svc-dev-myFunc"), &[naming("${MISSING}")]);

        match result {
            Err(SafeguardError::PatternCompile { pattern, .. }) => assert_eq!(pattern, "${MISSING}"),
            other => panic!("expected PatternCompile, got {:?}", other),
        }
    }

    // ── 5. configuration file end to end ──────────────────────────────────────

    #[test]
    fn test_config_driven_run() {
        let config = SafeguardConfig::from_toml_str(
            r#"
            [service]
            name = "orders"
            stage = "dev"
            functions = ["create-order"]

            [[policies]]
            id = "allowed-function-names"
            options = "${SERVICE}-${STAGE}-${FUNCTION}"

            [[policies]]
            id = "allowed-stages"
            options = ["prod"]
            enforcement_level = "warning"

            [[policies]]
            id = "require-dlq"
        "#,
        )
        .unwrap();

        let plan = DeploymentPlan::from_json_str(
            r#"{
                "Resources": {
                    "CreateDashorderLambdaFunction": {
                        "Type": "AWS::Lambda::Function",
                        "Properties": {
                            "FunctionName": "orders-dev-create-order",
                            "Runtime": "nodejs20.x",
                            "DeadLetterConfig": { "TargetArn": "arn:aws:sqs:us-east-1:1:dlq" }
                        }
                    },
                    "ServerlessDeploymentBucket": {
                        "Type": "AWS::S3::Bucket",
                        "Properties": {}
                    }
                }
            }"#,
        )
        .unwrap();

        let runner = PolicyRunner::new(builtin_registry());
        let report = runner.run(&config.deployment(plan), &config.policies).unwrap();

        let summary: Vec<(&str, bool)> = report
            .entries
            .iter()
            .map(|e| (e.policy_id.as_str(), e.verdict.is_approved()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("allowed-function-names", true),
                ("allowed-stages", false),
                ("require-dlq", true),
            ]
        );
        assert_eq!(report.entries[1].enforcement_level, EnforcementLevel::Warning);

        // A warning-level failure is reported but does not block.
        assert!(!report.blocks_deployment());
    }

    // ── 6. unknown id in a configured list ────────────────────────────────────

    #[test]
    fn test_unknown_policy_id() {
        let runner = PolicyRunner::new(builtin_registry());
        let configured = vec![
            naming("${SERVICE}-${STAGE}-.*"),
            ConfiguredPolicy::new("no-secret-env-vars", json!(null)),
        ];

        assert!(matches!(
            runner.run(&single_function("svc-dev-myFunc"), &configured),
            Err(SafeguardError::UnknownPolicy { .. })
        ));
    }
}
