//! Lookup table from policy id to policy implementation.

use std::collections::BTreeMap;

use safeguard_contracts::error::{SafeguardError, SafeguardResult};

use crate::traits::Policy;

/// Registered policies keyed by their id.
///
/// Registering a second policy under an existing id replaces the first.
#[derive(Default)]
pub struct PolicyRegistry {
    policies: BTreeMap<&'static str, Box<dyn Policy>>,
}

impl PolicyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `policy` under its own `id()`.
    pub fn register(&mut self, policy: Box<dyn Policy>) {
        self.policies.insert(policy.id(), policy);
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, policy: Box<dyn Policy>) -> Self {
        self.register(policy);
        self
    }

    /// Resolve `policy_id` to its implementation.
    ///
    /// Returns `SafeguardError::UnknownPolicy` when nothing is registered
    /// under that id.
    pub fn get(&self, policy_id: &str) -> SafeguardResult<&dyn Policy> {
        self.policies
            .get(policy_id)
            .map(|p| p.as_ref())
            .ok_or_else(|| SafeguardError::UnknownPolicy {
                policy_id: policy_id.to_string(),
            })
    }

    /// All registered policies, sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Policy> {
        self.policies.values().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl std::fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("policies", &self.policies.keys().collect::<Vec<_>>())
            .finish()
    }
}
