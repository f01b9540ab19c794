//! Policy definitions.
//!
//! A policy is a single allow/deny rule over a permission scope and an
//! optional resource reference pattern.

use crate::error::{PolicyError, Result};
use serde::{Deserialize, Serialize};

/// The reference pattern that matches any concrete resource reference.
pub const WILDCARD: &str = "*";

/// The effect of a policy: grant or revoke access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Access is granted.
    Allow,
    /// Access is revoked.
    Deny,
}

/// A single authorization rule.
///
/// A policy binds an [`Effect`] to an exact permission scope (e.g.
/// `"article:update-own"`) and a resource reference. The reference `"*"`
/// matches any concrete reference; any other reference matches by exact
/// string equality. Policies are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// The permission scope this policy applies to.
    scope: String,

    /// Whether matching access is allowed or denied.
    effect: Effect,

    /// The resource reference pattern; `"*"` matches any reference.
    reference: String,
}

impl Policy {
    /// Create a new policy.
    ///
    /// # Arguments
    ///
    /// * `scope` - The permission scope; must be non-empty.
    /// * `effect` - Allow or deny.
    /// * `reference` - The resource reference pattern.
    ///
    /// # Returns
    ///
    /// * `Ok(Policy)` - The policy.
    /// * `Err` - If the scope is empty.
    pub fn new(
        scope: impl Into<String>,
        effect: Effect,
        reference: impl Into<String>,
    ) -> Result<Self> {
        let scope = scope.into();
        if scope.is_empty() {
            return Err(PolicyError::EmptyScope.into());
        }

        Ok(Self {
            scope,
            effect,
            reference: reference.into(),
        })
    }

    /// Create an allow policy matching any reference within the scope.
    pub fn allow(scope: impl Into<String>) -> Result<Self> {
        Self::new(scope, Effect::Allow, WILDCARD)
    }

    /// Create an allow policy for a specific resource reference.
    pub fn allow_on(scope: impl Into<String>, reference: impl Into<String>) -> Result<Self> {
        Self::new(scope, Effect::Allow, reference)
    }

    /// Create a deny policy matching any reference within the scope.
    pub fn deny(scope: impl Into<String>) -> Result<Self> {
        Self::new(scope, Effect::Deny, WILDCARD)
    }

    /// Create a deny policy for a specific resource reference.
    pub fn deny_on(scope: impl Into<String>, reference: impl Into<String>) -> Result<Self> {
        Self::new(scope, Effect::Deny, reference)
    }

    /// Get the permission scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Get the effect.
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Get the reference pattern.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Check if this policy denies access.
    pub fn is_deny(&self) -> bool {
        self.effect == Effect::Deny
    }

    /// Check if this policy matches any reference within its scope.
    pub fn is_wildcard(&self) -> bool {
        self.reference == WILDCARD
    }

    /// Check if this policy applies to the given scope.
    ///
    /// Scopes compare by exact string equality; there is no wildcarding
    /// within a scope name.
    pub fn matches_scope(&self, scope: &str) -> bool {
        self.scope == scope
    }

    /// Check if this policy names the given concrete reference exactly.
    pub fn matches_reference(&self, reference: &str) -> bool {
        self.reference == reference
    }
}
