//! In-memory audit store.
//!
//! This module provides an in-memory implementation of the audit store,
//! suitable for tests and single-process hosts.

use dashmap::DashMap;
use std::sync::Arc;
use warden_core::error::Result;

use super::{AuditEntry, AuditStore};

/// An in-memory audit store.
///
/// Entries are kept per actor, oldest first. The store is cheap to clone;
/// clones share the same underlying entries.
#[derive(Clone)]
pub struct InMemoryAuditStore {
    /// The entries, indexed by actor ID.
    entries: Arc<DashMap<String, Vec<AuditEntry>>>,

    /// The maximum number of entries to keep per actor.
    max_entries_per_actor: usize,
}

impl InMemoryAuditStore {
    /// Create a new in-memory audit store keeping up to 1000 entries per
    /// actor.
    pub fn new() -> Self {
        Self::with_capacity_per_actor(1000)
    }

    /// Create a new in-memory audit store with an explicit per-actor cap.
    ///
    /// # Arguments
    ///
    /// * `max_entries_per_actor` - The maximum number of entries to keep
    ///   per actor; the oldest entries are dropped first.
    pub fn with_capacity_per_actor(max_entries_per_actor: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_entries_per_actor,
        }
    }

    /// Get the audit entries recorded for an actor, oldest first.
    pub fn entries_for(&self, actor_id: &str) -> Vec<AuditEntry> {
        match self.entries.get(actor_id) {
            Some(entries) => entries.clone(),
            None => Vec::new(),
        }
    }

    /// Get the total number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|entry| entry.value().len()).sum()
    }

    /// Check whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the audit entries for an actor.
    pub fn clear_entries(&self, actor_id: &str) {
        self.entries.remove(actor_id);
    }
}

impl Default for InMemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn log(&self, entry: AuditEntry) -> Result<()> {
        // Add the entry to the actor's log
        let mut actor_entries = self.entries.entry(entry.actor_id.clone()).or_default();
        actor_entries.push(entry);

        // Trim the log if necessary
        if actor_entries.len() > self.max_entries_per_actor {
            let to_remove = actor_entries.len() - self.max_entries_per_actor;
            actor_entries.drain(0..to_remove);
        }

        Ok(())
    }
}
