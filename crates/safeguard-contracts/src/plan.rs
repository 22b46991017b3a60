//! Deployment plan and function declaration types.
//!
//! A `DeploymentPlan` is produced by an upstream template compiler and handed
//! to the engine as-is. The engine only reads it; nothing in the workspace
//! mutates a plan after construction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SafeguardError, SafeguardResult};

/// Resource kind tag for compiled function resources.
pub const FUNCTION_RESOURCE_KIND: &str = "AWS::Lambda::Function";

/// A compiled deployment plan in CloudFormation shape.
///
/// ```json
/// { "Resources": { "HelloLambdaFunction": { "Type": "...", "Properties": {} } } }
/// ```
///
/// Resource entries are kept as raw JSON so that shape checks happen in the
/// resource extractor, where a bad entry can be reported by logical name.
/// Insertion order of `Resources` is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    #[serde(rename = "Resources", default)]
    resources: Map<String, Value>,
}

impl DeploymentPlan {
    /// Build a plan from an already-parsed `Resources` mapping.
    pub fn new(resources: Map<String, Value>) -> Self {
        Self { resources }
    }

    /// Parse a plan from a JSON document.
    ///
    /// Returns `SafeguardError::MalformedPlan` when the text is not JSON or
    /// the `Resources` member is not an object.
    pub fn from_json_str(s: &str) -> SafeguardResult<Self> {
        let value: Value = serde_json::from_str(s).map_err(|e| SafeguardError::MalformedPlan {
            resource: "<plan>".to_string(),
            reason: format!("failed to parse plan JSON: {e}"),
        })?;
        Self::from_value(value)
    }

    /// Convert a parsed JSON value into a plan.
    pub fn from_value(value: Value) -> SafeguardResult<Self> {
        serde_json::from_value(value).map_err(|e| SafeguardError::MalformedPlan {
            resource: "<plan>".to_string(),
            reason: format!("plan does not match the expected shape: {e}"),
        })
    }

    /// All resource entries in plan order.
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.resources.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Derive the compiled logical id for a user-declared function name.
///
/// Mirrors the provider naming convention: `-` becomes `Dash`, `_` becomes
/// `Underscore`, the first character is upper-cased, and `LambdaFunction` is
/// appended. `"hello-world"` → `"HelloDashworldLambdaFunction"`.
pub fn function_logical_id(function_name: &str) -> String {
    let normalized = function_name.replace('-', "Dash").replace('_', "Underscore");
    let mut chars = normalized.chars();
    let mut out = String::with_capacity(normalized.len() + "LambdaFunction".len());
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
    out.push_str("LambdaFunction");
    out
}

/// The functions a user declared in their service configuration.
///
/// Indexed by the logical id the provider compiled each function to, so
/// policies can translate a plan resource back to the name the user wrote.
#[derive(Debug, Clone, Default)]
pub struct FunctionDeclaration {
    by_logical_id: HashMap<String, String>,
}

impl FunctionDeclaration {
    /// Declare functions using the default provider naming convention.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_logical_ids(names.into_iter().map(|name| {
            let name = name.into();
            let logical_id = function_logical_id(&name);
            (name, logical_id)
        }))
    }

    /// Declare functions with explicit `(declared name, logical id)` pairs.
    pub fn from_logical_ids<I, N, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, L)>,
        N: Into<String>,
        L: Into<String>,
    {
        let mut declaration = Self::default();
        for (name, logical_id) in pairs {
            declaration.by_logical_id.insert(logical_id.into(), name.into());
        }
        declaration
    }

    /// The user-declared name for a compiled logical id, if any.
    pub fn declared_name(&self, logical_id: &str) -> Option<&str> {
        self.by_logical_id.get(logical_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_logical_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_logical_id.is_empty()
    }
}

/// Everything one policy run reads: service metadata plus the compiled plan.
///
/// Built once by the caller and shared read-only across every policy
/// invocation of a run.
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Service name as declared in the service configuration.
    pub service: String,
    /// Deployment stage, e.g. `"dev"` or `"prod"`.
    pub stage: String,
    /// Target provider region, e.g. `"us-east-1"`.
    pub region: String,
    /// Declared functions and their compiled logical ids.
    pub functions: FunctionDeclaration,
    /// The compiled plan under evaluation.
    pub plan: DeploymentPlan,
}
