//! Reference resolution from call arguments.
//!
//! A guard declaration names the resource it protects either as the
//! wildcard, as a dotted path into the guarded call's arguments, or as a
//! custom function over those arguments. This module provides the argument
//! snapshot type and the resolution logic.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use warden_core::error::{Error, ResolveError, Result};
use warden_core::model::WILDCARD;

/// Reserved argument key under which a post-execution guard merges the
/// guarded call's return value.
pub const RESULT_KEY: &str = "return";

/// A snapshot of a guarded call's arguments, by declared name.
///
/// Arguments are declared explicitly at the call site and serialized to
/// JSON values, so the resolver navigates data rather than reflecting over
/// the host function's signature.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    values: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Create an empty argument snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named argument, serializing its value.
    ///
    /// # Arguments
    ///
    /// * `name` - The declared argument name.
    /// * `value` - The call-time value; any `Serialize` type.
    ///
    /// # Returns
    ///
    /// * `Ok(CallArgs)` - The snapshot including the argument.
    /// * `Err` - If the value could not be serialized.
    pub fn arg<T: Serialize>(mut self, name: impl Into<String>, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| ResolveError::Serialization(e.to_string()))?;
        self.values.insert(name.into(), value);
        Ok(self)
    }

    /// Add a named argument from an already-built JSON value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Get an argument value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get the number of arguments in the snapshot.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the snapshot holds no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return a copy of this snapshot with the guarded call's result
    /// merged under [`RESULT_KEY`].
    pub fn with_result<T: Serialize>(&self, result: &T) -> Result<Self> {
        let mut merged = self.clone();
        let value = serde_json::to_value(result)
            .map_err(|e| ResolveError::Serialization(e.to_string()))?;
        merged.values.insert(RESULT_KEY.to_string(), value);
        Ok(merged)
    }
}

/// A custom reference resolver over a call's arguments.
pub type Resolver = dyn Fn(&CallArgs) -> Result<String> + Send + Sync;

/// How a guard derives the concrete resource reference for a call.
#[derive(Clone)]
pub enum RefSpec {
    /// Do not resolve; the reference is the wildcard `"*"`.
    Any,

    /// Navigate a dotted path into the argument snapshot, reading nested
    /// fields left to right (e.g. `"article.author"`).
    Path(String),

    /// Compute the reference with a custom function.
    Custom(Arc<Resolver>),
}

impl RefSpec {
    /// The wildcard specifier.
    pub fn any() -> Self {
        Self::Any
    }

    /// A dotted path specifier.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// A custom resolver function.
    pub fn custom<F>(resolver: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(resolver))
    }

    /// Resolve the concrete reference for a call.
    ///
    /// # Arguments
    ///
    /// * `args` - The call's argument snapshot.
    /// * `function` - The name of the guarded function, for diagnostics.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The resolved reference.
    /// * `Err` - If a dotted path could not be navigated, or the custom
    ///   resolver failed.
    pub fn resolve(&self, args: &CallArgs, function: &str) -> Result<String> {
        match self {
            Self::Any => Ok(WILDCARD.to_string()),
            Self::Path(path) => resolve_path(args, path, function),
            Self::Custom(resolver) => resolver(args),
        }
    }
}

impl fmt::Debug for RefSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Navigate a dotted path into the argument snapshot.
fn resolve_path(args: &CallArgs, path: &str, function: &str) -> Result<String> {
    let mut steps = path.split('.');

    // The first step selects an argument by name; the split always yields
    // at least one element.
    let first = steps.next().unwrap_or_default();
    let mut current = args.get(first).ok_or_else(|| unresolved(path, function))?;

    for step in steps {
        current = current
            .get(step)
            .ok_or_else(|| unresolved(path, function))?;
    }

    // The terminal value must render as a plain reference string
    match current {
        Value::String(value) => Ok(value.clone()),
        Value::Number(value) => Ok(value.to_string()),
        Value::Bool(value) => Ok(value.to_string()),
        _ => Err(unresolved(path, function)),
    }
}

fn unresolved(path: &str, function: &str) -> Error {
    ResolveError::UnresolvedPath {
        path: path.to_string(),
        function: function.to_string(),
    }
    .into()
}
