//! Policy models.
//!
//! This module defines the core authorization types: policies, roles and
//! actors, together with the evaluation algorithm.

pub mod actor;
pub mod policy;
pub mod role;

pub use actor::{Actor, ActorProvider};
pub use policy::{Effect, Policy, WILDCARD};
pub use role::Role;
