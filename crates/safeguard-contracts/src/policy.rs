//! Policy configuration, evaluation context, verdict, and report types.
//!
//! A policy consumes a `Deployment` and produces exactly one `Verdict`. The
//! runner collects one `ReportEntry` per configured policy into a
//! `PolicyReport`, preserving configuration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named variables available for substitution into a pattern template.
///
/// A variable can be declared without a value: the reference policy declares
/// `FUNCTION` for every function resource, even ones it cannot map back to a
/// declared function name. Referencing such a variable is not an error;
/// referencing an undeclared one is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyContext {
    variables: BTreeMap<String, Option<String>>,
}

impl PolicyContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with a value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), Some(value.into()));
        self
    }

    /// Declare `name`, with or without a value.
    pub fn with_optional(mut self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.variables.insert(name.into(), value.map(Into::into));
        self
    }

    /// Look up a variable.
    ///
    /// The outer `Option` says whether the variable is declared at all; the
    /// inner one whether it carries a value.
    pub fn lookup(&self, name: &str) -> Option<Option<&str>> {
        self.variables.get(name).map(|v| v.as_deref())
    }

    /// Declared variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}

/// The outcome of one policy invocation.
///
/// `Approved` if and only if no failure messages were recorded. Construct
/// from collected messages with [`Verdict::from_failures`] to keep that
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "messages", rename_all = "snake_case")]
pub enum Verdict {
    /// The deployment satisfies the policy.
    Approved,

    /// The deployment violates the policy. Messages are in the order the
    /// offending resources appear in the plan.
    Failed(Vec<String>),
}

impl Verdict {
    /// `Approved` when `messages` is empty, `Failed(messages)` otherwise.
    pub fn from_failures(messages: Vec<String>) -> Self {
        if messages.is_empty() {
            Verdict::Approved
        } else {
            Verdict::Failed(messages)
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Approved)
    }

    /// Failure messages; empty for `Approved`.
    pub fn messages(&self) -> &[String] {
        match self {
            Verdict::Approved => &[],
            Verdict::Failed(messages) => messages,
        }
    }
}

/// Whether a failed policy blocks the deployment or is only reported.
///
/// In TOML:
/// ```toml
/// enforcement_level = "error"
/// enforcement_level = "warning"
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnforcementLevel {
    #[default]
    Error,
    Warning,
}

/// One entry in the configured policy list.
///
/// `options` is policy-specific: a pattern string for
/// `allowed-function-names`, a list of strings for the allow-list policies,
/// and absent for policies that take none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredPolicy {
    /// Registry key of the policy to run.
    #[serde(rename = "id")]
    pub policy_id: String,

    /// Raw options handed to the policy unchanged.
    #[serde(default)]
    pub options: Value,

    #[serde(default)]
    pub enforcement_level: EnforcementLevel,
}

impl ConfiguredPolicy {
    /// A policy enforced at `Error` level.
    pub fn new(policy_id: impl Into<String>, options: Value) -> Self {
        Self {
            policy_id: policy_id.into(),
            options,
            enforcement_level: EnforcementLevel::Error,
        }
    }

    pub fn with_level(mut self, level: EnforcementLevel) -> Self {
        self.enforcement_level = level;
        self
    }
}

/// The verdict of a single configured policy, with the metadata a front end
/// needs to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub policy_id: String,
    pub verdict: Verdict,
    pub enforcement_level: EnforcementLevel,
    /// Documentation link of the policy implementation.
    pub docs_url: String,
}

/// The ordered result of a policy run, one entry per configured policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyReport {
    pub entries: Vec<ReportEntry>,
}

impl PolicyReport {
    /// True when every policy approved.
    pub fn is_approved(&self) -> bool {
        self.entries.iter().all(|e| e.verdict.is_approved())
    }

    /// True when some `Error`-level policy failed.
    pub fn blocks_deployment(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.enforcement_level == EnforcementLevel::Error && !e.verdict.is_approved())
    }

    /// Entries whose verdict is `Failed`, in configuration order.
    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| !e.verdict.is_approved())
    }
}
