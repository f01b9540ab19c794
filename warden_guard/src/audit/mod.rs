//! Audit records for authorization decisions.
//!
//! Every guarded call produces exactly one audit entry, written to an
//! [`AuditStore`] whether the call was allowed or denied.

mod in_memory;

pub use in_memory::InMemoryAuditStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_core::error::Result;
use warden_core::id::AuditId;

/// An immutable record of one authorization decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier of this entry.
    pub id: AuditId,

    /// The actor the decision was made for.
    pub actor_id: String,

    /// The permission scope that was checked.
    pub scope: String,

    /// The resolved resource reference the check ran against.
    pub reference: String,

    /// Whether access was granted. Defaults to `false`; finalized to
    /// `true` only on allow, before the entry is handed to the store.
    pub succeeded: bool,

    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Create a new, not-yet-succeeded entry for a decision in progress.
    pub fn new(
        actor_id: impl Into<String>,
        scope: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            id: AuditId::new(),
            actor_id: actor_id.into(),
            scope: scope.into(),
            reference: reference.into(),
            succeeded: false,
            timestamp: Utc::now(),
        }
    }

    /// Finalize this entry as an allowed decision.
    pub fn mark_succeeded(&mut self) {
        self.succeeded = true;
    }
}

/// Trait for stores that durably record audit entries.
///
/// Stores are append-only; ordering across concurrent entries is the
/// store's responsibility. A store failure must never change the access
/// decision it records.
pub trait AuditStore: Send + Sync {
    /// Append an entry to the store.
    ///
    /// # Arguments
    ///
    /// * `entry` - The finalized entry to record.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the entry was recorded.
    /// * `Err` - If the entry could not be recorded.
    fn log(&self, entry: AuditEntry) -> Result<()>;
}
