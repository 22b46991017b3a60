//! Resource extraction from a compiled deployment plan.
//!
//! Walks every `Resources` entry in plan order and yields typed records for
//! the entries whose kind matches. Every entry is shape-checked, including
//! the ones that are filtered out: a plan with one broken entry is rejected
//! as a whole.

use serde_json::{Map, Value};
use tracing::debug;

use safeguard_contracts::{
    error::{SafeguardError, SafeguardResult},
    plan::DeploymentPlan,
};

/// A single plan resource of the requested kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceRecord<'p> {
    /// Logical name of the resource inside the plan.
    pub logical_name: &'p str,
    /// Provider type tag, e.g. `"AWS::Lambda::Function"`.
    pub kind: &'p str,
    /// Declared properties of the resource.
    pub properties: &'p Map<String, Value>,
}

impl<'p> ResourceRecord<'p> {
    /// A string-valued property, or `None` when absent or not a string.
    pub fn str_property(&self, name: &str) -> Option<&'p str> {
        self.properties.get(name).and_then(Value::as_str)
    }

    /// A string-valued property that the resource contract requires.
    ///
    /// Returns `SafeguardError::MalformedPlan` naming this resource when the
    /// property is missing or not a string.
    pub fn required_str_property(&self, name: &str) -> SafeguardResult<&'p str> {
        self.str_property(name).ok_or_else(|| SafeguardError::MalformedPlan {
            resource: self.logical_name.to_string(),
            reason: format!("property '{name}' is missing or not a string"),
        })
    }
}

/// Return every resource in `plan` whose kind equals `kind_filter`.
///
/// Matching is exact and case-sensitive. Records are returned in plan order.
///
/// # Errors
///
/// `SafeguardError::MalformedPlan` if any entry is not an object, lacks a
/// string `Type`, or lacks an object `Properties`.
pub fn extract<'p>(plan: &'p DeploymentPlan, kind_filter: &str) -> SafeguardResult<Vec<ResourceRecord<'p>>> {
    let mut records = Vec::new();

    for (logical_name, entry) in plan.resources() {
        let record = parse_entry(logical_name, entry)?;
        if record.kind == kind_filter {
            records.push(record);
        }
    }

    debug!(
        kind = %kind_filter,
        matched = records.len(),
        total = plan.len(),
        "extracted plan resources"
    );

    Ok(records)
}

fn parse_entry<'p>(logical_name: &'p str, entry: &'p Value) -> SafeguardResult<ResourceRecord<'p>> {
    let malformed = |reason: &str| SafeguardError::MalformedPlan {
        resource: logical_name.to_string(),
        reason: reason.to_string(),
    };

    let entry = entry.as_object().ok_or_else(|| malformed("resource entry is not an object"))?;
    let kind = entry
        .get("Type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("resource has no string 'Type'"))?;
    let properties = entry
        .get("Properties")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("resource has no 'Properties' object"))?;

    Ok(ResourceRecord {
        logical_name,
        kind,
        properties,
    })
}
