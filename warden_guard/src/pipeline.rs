//! The guard pipeline.
//!
//! This module provides [`Auth`], the per-session orchestrator: it holds
//! the current actor, resolves resource references, delegates the verdict
//! to the actor's policies, writes an audit entry and either denies the
//! call or lets it proceed.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use warden_core::error::{AccessDenied, Result, SessionError};
use warden_core::model::{Actor, ActorProvider};

use crate::audit::{AuditEntry, AuditStore};
use crate::resolve::{CallArgs, RefSpec};

/// A dynamic fallback decision function, consulted only when static policy
/// evaluation denies. Returning `true` lets the call proceed anyway.
pub type OnGuard = dyn Fn(&Actor, &str, &str) -> bool + Send + Sync;

/// Whether a guard runs before or after the wrapped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    /// Check before invoking the wrapped call; a denial prevents it.
    Pre,
    /// Invoke the wrapped call first, then check with its result merged
    /// into the arguments. A denial is raised after the call's side
    /// effects have happened.
    Post,
}

/// A guard declaration: the metadata that wraps a guarded call.
///
/// This is the explicit form of the decorator pattern: a scope, a
/// reference specifier and a pre/post mode, reusable across call sites.
#[derive(Debug, Clone)]
pub struct Guard {
    /// Name of the guarded function, used in diagnostics.
    function: String,

    /// The permission scope this guard checks.
    scope: String,

    /// How the resource reference is derived from the call.
    reference: RefSpec,

    /// Whether the check runs before or after the call.
    mode: GuardMode,
}

impl Guard {
    /// Declare a pre-execution guard.
    ///
    /// # Arguments
    ///
    /// * `function` - Name of the guarded function, for diagnostics.
    /// * `scope` - The permission scope to check.
    /// * `reference` - How to derive the resource reference.
    pub fn pre(
        function: impl Into<String>,
        scope: impl Into<String>,
        reference: RefSpec,
    ) -> Self {
        Self {
            function: function.into(),
            scope: scope.into(),
            reference,
            mode: GuardMode::Pre,
        }
    }

    /// Declare a post-execution guard.
    ///
    /// The wrapped call runs first and its result is merged into the
    /// argument snapshot under [`crate::RESULT_KEY`] before the reference
    /// is resolved. Callers must treat a denial as a
    /// check-then-possibly-roll-back boundary: the call's side effects
    /// have already happened.
    pub fn post(
        function: impl Into<String>,
        scope: impl Into<String>,
        reference: RefSpec,
    ) -> Self {
        Self {
            function: function.into(),
            scope: scope.into(),
            reference,
            mode: GuardMode::Post,
        }
    }

    /// Get the guarded function name.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Get the permission scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Get the reference specifier.
    pub fn reference(&self) -> &RefSpec {
        &self.reference
    }

    /// Get the guard mode.
    pub fn mode(&self) -> GuardMode {
        self.mode
    }
}

/// The per-session guard pipeline.
///
/// An `Auth` instance is session-scoped ambient state: it holds at most
/// one current actor, set by [`authorize`](Self::authorize) and read by
/// every guard invocation. Never share one instance across concurrent
/// sessions; create one per request or per logical session instead.
pub struct Auth<P, S> {
    /// Supplies actors by identifier.
    provider: P,

    /// Records one entry per guarded call.
    store: S,

    /// Optional dynamic fallback, consulted on static deny.
    on_guard: Option<Box<OnGuard>>,

    /// The session's current actor, if any.
    actor: RwLock<Option<Arc<Actor>>>,
}

impl<P, S> Auth<P, S>
where
    P: ActorProvider,
    S: AuditStore,
{
    /// Create a new guard pipeline.
    ///
    /// # Arguments
    ///
    /// * `provider` - The actor provider.
    /// * `store` - The audit store.
    pub fn new(provider: P, store: S) -> Self {
        Self {
            provider,
            store,
            on_guard: None,
            actor: RwLock::new(None),
        }
    }

    /// Attach a dynamic fallback decision function.
    ///
    /// The fallback runs only when static policy evaluation denies; it
    /// supports context-dependent rules (e.g. ownership checks) that
    /// cannot be expressed as static policies.
    pub fn with_on_guard<F>(mut self, on_guard: F) -> Self
    where
        F: Fn(&Actor, &str, &str) -> bool + Send + Sync + 'static,
    {
        self.on_guard = Some(Box::new(on_guard));
        self
    }

    /// Set the session's current actor, replacing any prior one.
    ///
    /// # Arguments
    ///
    /// * `actor_id` - The identifier to look up with the actor provider.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Actor>)` - The authorized actor.
    /// * `Err` - If the provider knows no such actor.
    pub fn authorize(&self, actor_id: &str) -> Result<Arc<Actor>> {
        let actor = self
            .provider
            .get_actor(actor_id)
            .ok_or_else(|| SessionError::UnknownActor(actor_id.to_string()))?;

        let actor = Arc::new(actor);
        *self.actor.write() = Some(actor.clone());
        debug!("Authorized actor {}", actor_id);

        Ok(actor)
    }

    /// Get the session's current actor, if one is set.
    pub fn current_actor(&self) -> Option<Arc<Actor>> {
        self.actor.read().clone()
    }

    /// Clear the session's current actor.
    pub fn clear(&self) {
        *self.actor.write() = None;
        debug!("Cleared session actor");
    }

    /// Check the current actor against a scope and reference.
    ///
    /// Static policy evaluation runs first; on deny, the dynamic fallback
    /// (if any) gets the final word.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The decision.
    /// * `Err` - If no actor is authorized in this session.
    pub fn is_allowed(&self, scope: &str, reference: &str) -> Result<bool> {
        let actor = self.current_actor().ok_or(SessionError::MissingActor)?;
        Ok(self.evaluate(&actor, scope, reference))
    }

    /// Run a guarded call.
    ///
    /// For a pre-execution guard: resolve the reference from the call
    /// arguments, evaluate, write one audit entry, and invoke the call
    /// only on allow. For a post-execution guard: invoke the call, merge
    /// its result into the arguments, then resolve, evaluate and audit the
    /// same way; on deny the call's side effects have already happened.
    ///
    /// The result type must serialize because post-execution guards merge
    /// it into the argument snapshot.
    ///
    /// # Arguments
    ///
    /// * `guard` - The guard declaration.
    /// * `args` - The call's argument snapshot.
    /// * `call` - The wrapped call.
    ///
    /// # Returns
    ///
    /// * `Ok(R)` - The call's result, if allowed.
    /// * `Err` - A session error (no audit written), a reference
    ///   resolution error (no audit written), or an access denial (audit
    ///   written first).
    pub fn protect<F, R>(&self, guard: &Guard, args: &CallArgs, call: F) -> Result<R>
    where
        F: FnOnce() -> R,
        R: Serialize,
    {
        // Session precondition; not an access decision, so no audit entry
        let actor = self.current_actor().ok_or(SessionError::MissingActor)?;

        match guard.mode() {
            GuardMode::Pre => {
                let reference = guard.reference().resolve(args, guard.function())?;
                self.assert_and_audit(&actor, guard.scope(), &reference)?;
                Ok(call())
            }
            GuardMode::Post => {
                let result = call();
                let merged = args.with_result(&result)?;
                let reference = guard.reference().resolve(&merged, guard.function())?;
                self.assert_and_audit(&actor, guard.scope(), &reference)?;
                Ok(result)
            }
        }
    }

    /// Evaluate statically, then fall back to the dynamic decision.
    fn evaluate(&self, actor: &Actor, scope: &str, reference: &str) -> bool {
        if actor.is_allowed(scope, reference) {
            return true;
        }

        match &self.on_guard {
            Some(on_guard) if on_guard(actor, scope, reference) => {
                debug!(
                    "Fallback allowed actor {} on scope {} reference {}",
                    actor.actor_id(),
                    scope,
                    reference
                );
                true
            }
            _ => false,
        }
    }

    /// Decide, write exactly one audit entry, and deny if not allowed.
    fn assert_and_audit(&self, actor: &Actor, scope: &str, reference: &str) -> Result<()> {
        let allowed = self.evaluate(actor, scope, reference);

        let mut entry = AuditEntry::new(actor.actor_id(), scope, reference);
        if allowed {
            entry.mark_succeeded();
        }

        // The decision stands whether or not the write lands
        if let Err(error) = self.store.log(entry) {
            warn!(
                "Audit write failed for actor {} on scope {}: {}",
                actor.actor_id(),
                scope,
                error
            );
        }

        if !allowed {
            return Err(AccessDenied {
                scope: scope.to_string(),
                reference: reference.to_string(),
            }
            .into());
        }

        Ok(())
    }
}
