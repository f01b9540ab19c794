//! # Warden Core
//!
//! `warden_core` provides the policy data model for the Warden
//! authorization engine. Given an authenticated actor, a named permission
//! scope and an optional resource reference, it decides allow or deny.
//!
//! Key concepts:
//!
//! 1. **Policy**: A single allow/deny rule over a scope and an optional
//!    resource reference pattern.
//!
//! 2. **Role**: A named, reusable bundle of policies that can be shared
//!    across actors.
//!
//! 3. **Actor**: The authenticated identity being checked. An actor owns
//!    its own policies plus a set of roles and answers permission queries.
//!
//! 4. **Evaluation**: Reference-specific policies take precedence over
//!    wildcard policies; within a tier a single deny wins; no matching
//!    policy at all means deny.

pub mod error;
pub mod id;
pub mod model;

// Re-export key types for convenience
pub use error::{AccessDenied, Error, PolicyError, ResolveError, Result, SessionError};
pub use id::AuditId;
pub use model::{Actor, ActorProvider, Effect, Policy, Role, WILDCARD};
