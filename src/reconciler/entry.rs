use serde::Serialize;

use crate::reconciler::OptimisticRecord;

/// Display id of an entry created locally and not yet confirmed.
pub const OPTIMISTIC_ID: &str = "optimistic";
/// Display id of an entry marked for removal and not yet confirmed.
pub const DELETE_ID: &str = "delete";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryStatus {
    Persisted,
    PendingCreate,
    PendingDelete,
}

/// A row of the reconciled list: the record plus its pending lifecycle state.
/// The record's own id is never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry<R> {
    pub status: EntryStatus,
    pub record: R,
}

impl<R: OptimisticRecord> ListEntry<R> {
    pub fn persisted(record: R) -> Self {
        Self {
            status: EntryStatus::Persisted,
            record,
        }
    }

    pub fn pending_create(record: R) -> Self {
        Self {
            status: EntryStatus::PendingCreate,
            record,
        }
    }

    /// Id to render: the sentinel for pending rows, the real id otherwise.
    pub fn display_id(&self) -> &str {
        match self.status {
            EntryStatus::Persisted => self.record.record_id(),
            EntryStatus::PendingCreate => OPTIMISTIC_ID,
            EntryStatus::PendingDelete => DELETE_ID,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status != EntryStatus::Persisted
    }

    /// Whether an update or delete aimed at `id` applies to this row.
    /// Locally created rows have no real id yet and never match.
    pub(crate) fn targets(&self, id: &str) -> bool {
        self.status != EntryStatus::PendingCreate && self.record.record_id() == id
    }
}
