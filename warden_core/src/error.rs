//! Error types for the Warden authorization engine.
//!
//! This module defines a layered error hierarchy that lets callers
//! distinguish the three user-visible failure classes: a missing or invalid
//! session, a denied access decision, and a reference that could not be
//! resolved from call arguments. Each implies a different caller fix.

use thiserror::Error;

/// Root error type for the Warden system.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    AccessDenied(#[from] AccessDenied),

    #[error("Reference resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),
}

/// Errors related to the authorization session.
///
/// These are fatal to the guarded call and are never retried by the core.
/// They are session problems, not access decisions, so no audit entry is
/// written for them.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No actor is authorized in the current session")]
    MissingActor,

    #[error("Actor not found: {0}")]
    UnknownActor(String),
}

/// Access was denied for a scope and resolved reference.
///
/// Always carries the scope and the resolved reference for diagnostics,
/// and is always preceded by a completed audit write.
#[derive(Debug, Error)]
#[error("Access denied to referenced resource `{reference}` on scope `{scope}`")]
pub struct AccessDenied {
    /// The permission scope that was checked.
    pub scope: String,

    /// The resolved resource reference the check ran against.
    pub reference: String,
}

/// Errors related to reference resolution.
///
/// Distinct from a denial: a resolution failure indicates a malformed guard
/// declaration, not a policy outcome.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Could not resolve reference path `{path}` from arguments of `{function}`")]
    UnresolvedPath {
        /// The dotted path expression that failed to navigate.
        path: String,
        /// The name of the guarded function.
        function: String,
    },

    #[error("Could not serialize call argument: {0}")]
    Serialization(String),
}

/// Errors related to policy and role construction.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Policy scope cannot be empty")]
    EmptyScope,

    #[error("Invalid role name: {0}")]
    InvalidRoleName(String),
}

/// Result type alias for Warden operations.
pub type Result<T> = std::result::Result<T, Error>;
