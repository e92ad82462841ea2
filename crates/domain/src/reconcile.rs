use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{ImageId, ImageRecord, PendingSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub merged: Vec<ImageRecord>,
    pub pending: PendingSet,
}

impl Reconciliation {
    pub fn confirmed(&self, before: &PendingSet) -> usize {
        before.len().saturating_sub(self.pending.len())
    }
}

pub fn reconcile(pending: &PendingSet, authoritative: &[ImageRecord]) -> Reconciliation {
    let mut by_id: IndexMap<&ImageId, &ImageRecord> =
        IndexMap::with_capacity(pending.len() + authoritative.len());

    for record in pending {
        by_id.insert(&record.id, record);
    }
    // Inserting an existing key keeps its slot and swaps in the listing's record.
    for record in authoritative {
        by_id.insert(&record.id, record);
    }

    let confirmed: HashSet<&ImageId> = authoritative.iter().map(|record| &record.id).collect();
    let still_pending: Vec<ImageRecord> = pending
        .iter()
        .filter(|record| !confirmed.contains(&record.id))
        .cloned()
        .collect();

    let mut merged: Vec<ImageRecord> = by_id.into_values().cloned().collect();
    // Stable, so equal timestamps keep insertion order. Undated records sink to the end.
    merged.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

    Reconciliation {
        merged,
        pending: PendingSet::from(still_pending),
    }
}
