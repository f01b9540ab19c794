//! Actor definitions and policy evaluation.
//!
//! An actor is the authenticated identity being checked. It owns its own
//! policies plus a set of roles and answers permission queries over the
//! combined pool.

use crate::model::{Policy, Role, WILDCARD};
use std::sync::Arc;
use tracing::debug;

/// The authenticated identity being authorized.
///
/// An actor is created per authenticated session and owned by that session.
/// Attaching policies or roles is an administrative operation, never part of
/// the guard path; on the guard path an actor is read-only.
#[derive(Debug, Clone)]
pub struct Actor {
    /// The actor identifier, as known to the actor provider.
    actor_id: String,

    /// Policies attached directly to this actor, in attachment order.
    policies: Vec<Policy>,

    /// Roles attached to this actor, in attachment order. Roles may be
    /// shared across actors.
    roles: Vec<Arc<Role>>,
}

impl Actor {
    /// Create a new actor with no policies and no roles.
    ///
    /// A fresh actor denies everything: absence of any matching policy is
    /// itself a decision.
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            policies: Vec::new(),
            roles: Vec::new(),
        }
    }

    /// Get the actor identifier.
    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    /// Get the policies attached directly to this actor.
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Get the roles attached to this actor.
    pub fn roles(&self) -> &[Arc<Role>] {
        &self.roles
    }

    /// Attach a policy directly to this actor.
    pub fn add_policy(&mut self, policy: Policy) {
        self.policies.push(policy);
    }

    /// Attach a role to this actor.
    pub fn add_role(&mut self, role: Arc<Role>) {
        self.roles.push(role);
    }

    /// Attach a policy, consuming and returning the actor for chaining.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Attach a role, consuming and returning the actor for chaining.
    pub fn with_role(mut self, role: Arc<Role>) -> Self {
        self.roles.push(role);
        self
    }

    /// Check if this actor may act on the given scope and reference.
    ///
    /// Every policy visible to the actor is considered: the actor's own
    /// policies, then each role's policies in attachment order. Policies
    /// whose scope matches are partitioned by match tightness:
    ///
    /// 1. Reference-specific matches (exact equality, both non-wildcard).
    /// 2. Wildcard-reference matches.
    ///
    /// The first non-empty tier wins; within that tier a single deny wins.
    /// If no policy references the scope at all, the result is deny.
    ///
    /// Declaration order never changes the verdict: a reference-specific
    /// rule carves out an exception from a broader wildcard rule no matter
    /// where it was attached.
    pub fn is_allowed(&self, scope: &str, reference: &str) -> bool {
        let mut specific: Option<bool> = None;
        let mut wildcard: Option<bool> = None;

        for policy in self.visible_policies() {
            if !policy.matches_scope(scope) {
                continue;
            }

            if policy.is_wildcard() {
                let denied = wildcard.get_or_insert(false);
                *denied |= policy.is_deny();
            } else if reference != WILDCARD && policy.matches_reference(reference) {
                let denied = specific.get_or_insert(false);
                *denied |= policy.is_deny();
            }
        }

        // First non-empty tier wins; nothing matched means deny.
        let allowed = match (specific, wildcard) {
            (Some(denied), _) => !denied,
            (None, Some(denied)) => !denied,
            (None, None) => false,
        };

        debug!(
            "Evaluated actor {} on scope {} reference {}: {}",
            self.actor_id,
            scope,
            reference,
            if allowed { "allow" } else { "deny" }
        );

        allowed
    }

    /// Check if this actor may act on the given scope, for any reference.
    pub fn is_allowed_any(&self, scope: &str) -> bool {
        self.is_allowed(scope, WILDCARD)
    }

    /// All policies visible to this actor: its own, then each role's.
    fn visible_policies(&self) -> impl Iterator<Item = &Policy> {
        self.policies
            .iter()
            .chain(self.roles.iter().flat_map(|role| role.policies().iter()))
    }
}

/// Trait for types that supply actors to the guard pipeline.
///
/// The storage mechanism behind a provider is irrelevant to the engine;
/// only the lookup contract matters. Returning `None` for an identifier is
/// surfaced as a session error by the pipeline, not as an access decision.
pub trait ActorProvider: Send + Sync {
    /// Fetch the actor for the given identifier.
    fn get_actor(&self, actor_id: &str) -> Option<Actor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_actor_denies_everything() {
        let actor = Actor::new("1");

        assert!(!actor.is_allowed_any("user:update"));
        assert!(!actor.is_allowed("user:update", "id"));
        assert!(!actor.is_allowed_any("anything:else"));
    }

    #[test]
    fn test_wildcard_allow_covers_any_reference() {
        let actor = Actor::new("1").with_policy(Policy::allow("user:update").unwrap());

        assert!(actor.is_allowed_any("user:update"));
        assert!(actor.is_allowed("user:update", "id"));
        assert!(!actor.is_allowed_any("user:create"));
    }

    #[test]
    fn test_specific_deny_overrides_wildcard_allow() {
        let actor = Actor::new("1")
            .with_policy(Policy::allow("user:update").unwrap())
            .with_policy(Policy::deny_on("user:update", "id").unwrap());

        assert!(actor.is_allowed_any("user:update"));
        assert!(actor.is_allowed("user:update", "other-id"));
        assert!(!actor.is_allowed("user:update", "id"));
    }

    #[test]
    fn test_declaration_order_does_not_matter() {
        // Same policies as above, attached in the opposite order
        let actor = Actor::new("1")
            .with_policy(Policy::deny_on("user:update", "id").unwrap())
            .with_policy(Policy::allow("user:update").unwrap());

        assert!(actor.is_allowed("user:update", "other-id"));
        assert!(!actor.is_allowed("user:update", "id"));
    }

    #[test]
    fn test_specific_allow_carves_out_wildcard_deny() {
        let actor = Actor::new("1")
            .with_policy(Policy::deny("user:update").unwrap())
            .with_policy(Policy::allow_on("user:update", "own-id").unwrap());

        assert!(actor.is_allowed("user:update", "own-id"));
        assert!(!actor.is_allowed("user:update", "other-id"));
        assert!(!actor.is_allowed_any("user:update"));
    }

    #[test]
    fn test_deny_wins_within_a_tier() {
        let actor = Actor::new("1")
            .with_policy(Policy::allow_on("user:update", "id").unwrap())
            .with_policy(Policy::deny_on("user:update", "id").unwrap());

        assert!(!actor.is_allowed("user:update", "id"));
    }

    #[test]
    fn test_role_policy_has_same_effect_as_direct_policy() {
        let role = Arc::new(
            Role::new("creator")
                .unwrap()
                .with_policy(Policy::allow("user:create").unwrap()),
        );

        let mut actor = Actor::new("1");
        assert!(!actor.is_allowed_any("user:create"));

        actor.add_role(role.clone());
        assert!(actor.is_allowed_any("user:create"));

        // The same role can be shared with another actor
        let other = Actor::new("2").with_role(role);
        assert!(other.is_allowed_any("user:create"));
    }

    #[test]
    fn test_role_and_actor_policies_form_one_pool() {
        let role = Arc::new(
            Role::new("writer")
                .unwrap()
                .with_policy(Policy::allow("article:update").unwrap()),
        );

        let actor = Actor::new("1")
            .with_role(role)
            .with_policy(Policy::deny_on("article:update", "locked").unwrap());

        assert!(actor.is_allowed("article:update", "free"));
        assert!(!actor.is_allowed("article:update", "locked"));
    }

    #[test]
    fn test_wildcard_query_ignores_specific_policies() {
        let actor = Actor::new("1")
            .with_policy(Policy::allow_on("user:update", "id").unwrap());

        // Only a wildcard policy can answer a wildcard query
        assert!(!actor.is_allowed_any("user:update"));
        assert!(actor.is_allowed("user:update", "id"));
    }
}
