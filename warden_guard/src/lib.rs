//! # Warden Guard
//!
//! `warden_guard` provides the runtime half of the Warden authorization
//! engine: the audited guard pipeline built on top of the policy model in
//! `warden_core`.
//!
//! Key concepts:
//!
//! 1. **Guard Pipeline**: [`Auth`] holds the session's current actor,
//!    evaluates scope and reference against it, writes an audit entry and
//!    either denies or lets the wrapped call proceed.
//!
//! 2. **Reference Resolution**: [`RefSpec`] extracts a concrete resource
//!    reference from a guarded call's arguments (and, for post-hoc guards,
//!    its result) using a dotted path expression or a custom function.
//!
//! 3. **Audit**: Every guarded call writes exactly one immutable
//!    [`AuditEntry`] to an [`AuditStore`], on allow and deny alike.
//!
//! # Example
//!
//! ```
//! use warden_guard::{Auth, CallArgs, Guard, InMemoryAuditStore, RefSpec};
//! use warden_guard::{Actor, ActorProvider, Policy};
//!
//! struct StaticProvider;
//!
//! impl ActorProvider for StaticProvider {
//!     fn get_actor(&self, actor_id: &str) -> Option<Actor> {
//!         let mut actor = Actor::new(actor_id);
//!         actor.add_policy(Policy::allow("article:create").unwrap());
//!         Some(actor)
//!     }
//! }
//!
//! let auth = Auth::new(StaticProvider, InMemoryAuditStore::new());
//! auth.authorize("bob_writer").unwrap();
//!
//! let guard = Guard::pre("create_article", "article:create", RefSpec::any());
//! let title = auth
//!     .protect(&guard, &CallArgs::new(), || "Lorem Ipsum".to_string())
//!     .unwrap();
//! assert_eq!(title, "Lorem Ipsum");
//! ```

pub mod audit;
pub mod pipeline;
pub mod resolve;

// Re-export key types for convenience
pub use audit::{AuditEntry, AuditStore, InMemoryAuditStore};
pub use pipeline::{Auth, Guard, GuardMode};
pub use resolve::{CallArgs, RefSpec, RESULT_KEY};

// Re-export the policy model from warden_core for convenience
pub use warden_core::error::{AccessDenied, Error, Result, SessionError};
pub use warden_core::model::{Actor, ActorProvider, Effect, Policy, Role, WILDCARD};
