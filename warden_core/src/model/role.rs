//! Role definitions.
//!
//! A role is a named, reusable bundle of policies. Roles carry no
//! evaluation logic of their own; evaluation happens via the owning actor.

use crate::error::{PolicyError, Result};
use crate::model::Policy;
use serde::{Deserialize, Serialize};

/// A named, append-only bundle of policies.
///
/// Roles are attached to actors and may be shared across actors (wrap in
/// `Arc` for shared ownership). Once on the guard path a role is read-only;
/// adding policies is an administrative operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// The role name.
    name: String,

    /// The policies this role grants, in attachment order.
    policies: Vec<Policy>,
}

impl Role {
    /// Create a new empty role.
    ///
    /// # Arguments
    ///
    /// * `name` - The role name. Must be non-empty and consist of
    ///   lower-case alphanumerics, `-`, `_` or `.`.
    ///
    /// # Returns
    ///
    /// * `Ok(Role)` - The role.
    /// * `Err` - If the name is empty or contains invalid characters.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(PolicyError::InvalidRoleName(name).into());
        }

        Ok(Self {
            name,
            policies: Vec::new(),
        })
    }

    /// Get the role name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the policies this role grants.
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Append a policy to this role.
    pub fn add_policy(&mut self, policy: Policy) {
        self.policies.push(policy);
    }

    /// Append a policy, consuming and returning the role for chaining.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
}
