//! Optimistic list reconciliation.
//!
//! A list view renders the last authoritative list fetched from the store,
//! overlaid with the user's own in-flight actions. [`reconcile`] is the pure
//! transform applying one action to the current list; [`OptimisticList`]
//! holds that state between dispatches and is reset wholesale whenever a
//! fresh authoritative list arrives.
//!
//! The transform never fails and never performs I/O. Relationship fields are
//! resolved through an [`EmployeeDirectory`] passed in the
//! [`ReconcileContext`], and an id missing from the directory resolves to a
//! placeholder employee instead of an error.

use std::fmt;

use chrono::{DateTime, Utc};
use im::Vector;

use crate::domain::EmployeeDirectory;

pub mod action;
pub mod entry;
mod records;

pub use action::OptimisticAction;
pub use entry::{DELETE_ID, EntryStatus, ListEntry, OPTIMISTIC_ID};

/// Everything the transform may read besides the list itself.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileContext<'a> {
    pub directory: &'a EmployeeDirectory,
    /// Timestamp stamped on records synthesized for pending creates.
    pub now: DateTime<Utc>,
}

impl<'a> ReconcileContext<'a> {
    pub fn new(directory: &'a EmployeeDirectory) -> Self {
        Self {
            directory,
            now: Utc::now(),
        }
    }

    pub fn at(directory: &'a EmployeeDirectory, now: DateTime<Utc>) -> Self {
        Self { directory, now }
    }
}

/// A record type that can appear in an optimistic list.
pub trait OptimisticRecord: Clone + PartialEq + fmt::Debug {
    /// Create payload.
    type Draft: Clone + PartialEq + fmt::Debug + Send + Sync;
    /// Update payload; names its target row.
    type Patch: Clone + PartialEq + fmt::Debug + Send + Sync;

    fn record_id(&self) -> &str;

    fn patch_target(patch: &Self::Patch) -> &str;

    /// Build a full record from a create payload. Missing nullable fields
    /// become explicit nulls; relationships are resolved via the directory.
    fn synthesize(draft: &Self::Draft, ctx: &ReconcileContext<'_>) -> Self;

    /// Field-by-field overlay of a patch onto this record.
    fn overlay(&self, patch: &Self::Patch, ctx: &ReconcileContext<'_>) -> Self;
}

pub type ActionFor<R> =
    OptimisticAction<<R as OptimisticRecord>::Draft, <R as OptimisticRecord>::Patch>;

/// Apply one action to the reconciled list.
///
/// Create appends, update and delete touch only the targeted row in place,
/// and anything else returns the input unchanged. Untouched rows are shared
/// with the input list.
pub fn reconcile<R: OptimisticRecord>(
    state: &Vector<ListEntry<R>>,
    action: &ActionFor<R>,
    ctx: &ReconcileContext<'_>,
) -> Vector<ListEntry<R>> {
    match action {
        OptimisticAction::Create(draft) => {
            let mut next = state.clone();
            next.push_back(ListEntry::pending_create(R::synthesize(draft, ctx)));
            next
        }
        OptimisticAction::Update(patch) => {
            let target = R::patch_target(patch);
            replace_targeted(state, target, |entry| ListEntry {
                status: entry.status,
                record: entry.record.overlay(patch, ctx),
            })
        }
        OptimisticAction::Delete(id) => replace_targeted(state, id, |entry| ListEntry {
            status: EntryStatus::PendingDelete,
            record: entry.record.clone(),
        }),
        OptimisticAction::Unsupported(_) => state.clone(),
    }
}

fn replace_targeted<R: OptimisticRecord>(
    state: &Vector<ListEntry<R>>,
    target: &str,
    replace: impl Fn(&ListEntry<R>) -> ListEntry<R>,
) -> Vector<ListEntry<R>> {
    let mut next = state.clone();
    for (index, entry) in state.iter().enumerate() {
        if entry.targets(target) {
            next.set(index, replace(entry));
        }
    }
    next
}

/// Reconciled list state for one list view.
#[derive(Debug, Clone)]
pub struct OptimisticList<R: OptimisticRecord> {
    authoritative: Vector<R>,
    entries: Vector<ListEntry<R>>,
}

impl<R: OptimisticRecord> OptimisticList<R> {
    pub fn new(authoritative: impl IntoIterator<Item = R>) -> Self {
        let authoritative: Vector<R> = authoritative.into_iter().collect();
        let entries = authoritative.iter().cloned().map(ListEntry::persisted).collect();
        Self {
            authoritative,
            entries,
        }
    }

    pub fn dispatch(
        &mut self,
        action: &ActionFor<R>,
        ctx: &ReconcileContext<'_>,
    ) -> &Vector<ListEntry<R>> {
        self.entries = reconcile(&self.entries, action, ctx);
        &self.entries
    }

    /// Replace everything with a freshly fetched authoritative list,
    /// discarding every pending overlay.
    pub fn reset(&mut self, authoritative: impl IntoIterator<Item = R>) {
        *self = Self::new(authoritative);
    }

    /// Drop pending overlays and go back to the last authoritative list.
    pub fn revert(&mut self) {
        self.entries = self
            .authoritative
            .iter()
            .cloned()
            .map(ListEntry::persisted)
            .collect();
    }

    pub fn entries(&self) -> &Vector<ListEntry<R>> {
        &self.entries
    }

    pub fn authoritative(&self) -> &Vector<R> {
        &self.authoritative
    }

    /// Rows worth rendering: everything not awaiting deletion.
    pub fn visible(&self) -> impl Iterator<Item = &ListEntry<R>> {
        self.entries
            .iter()
            .filter(|entry| entry.status != EntryStatus::PendingDelete)
    }

    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_pending()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, EmployeePatch, NewEmployee};

    fn employee(id: &str, first: &str) -> Employee {
        Employee {
            id: id.into(),
            last_name: None,
            first_name: first.into(),
            email: format!("{id}@example.com"),
            role: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    fn draft(first: &str) -> NewEmployee {
        NewEmployee {
            last_name: None,
            first_name: first.into(),
            email: "new@example.com".into(),
            role: None,
        }
    }

    #[test]
    fn test_pending_create_never_matches_update_targets() {
        let directory = EmployeeDirectory::new();
        let ctx = ReconcileContext::new(&directory);
        let mut list = OptimisticList::new(Vec::<Employee>::new());
        list.dispatch(&OptimisticAction::Create(draft("Ann")), &ctx);

        let mut patch = EmployeePatch::new("");
        patch.first_name = Some("Changed".into());
        list.dispatch(&OptimisticAction::Update(patch), &ctx);

        assert_eq!(list.entries()[0].record.first_name, "Ann");
    }

    #[test]
    fn test_revert_and_reset_discard_overlays() {
        let directory = EmployeeDirectory::new();
        let ctx = ReconcileContext::new(&directory);
        let mut list = OptimisticList::new(vec![employee("e1", "Ann")]);

        list.dispatch(&OptimisticAction::Delete("e1".into()), &ctx);
        list.dispatch(&OptimisticAction::Create(draft("Bo")), &ctx);
        assert_eq!(list.pending(), 2);
        assert_eq!(list.visible().count(), 1);

        list.revert();
        assert_eq!(list.pending(), 0);
        assert_eq!(list.entries()[0].display_id(), "e1");

        list.reset(vec![employee("e2", "Bo")]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.authoritative()[0].id, "e2");
    }
}
