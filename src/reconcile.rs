use std::collections::HashSet;

use crate::models::peer::PeerRecord;

/// Outcome of comparing the displayed addresses against a fresh engine snapshot.
#[derive(Debug, Default, PartialEq)]
pub struct Reconciliation {
    /// New rows, in the order the engine reported them.
    pub to_insert: Vec<PeerRecord>,
    /// Records for rows that stay. Applied after the inserts.
    pub to_update: Vec<PeerRecord>,
    /// Addresses that vanished from the snapshot.
    pub to_remove: Vec<String>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }
}

/// Classifies every fresh record as an insert or an update and every address
/// that is no longer reported as a removal.
///
/// An address seen twice in `fresh` (two connections from one IP) is inserted
/// once; later occurrences become updates of that row.
pub fn reconcile(current: &HashSet<String>, fresh: &[PeerRecord]) -> Reconciliation {
    let mut seen: HashSet<String> = HashSet::with_capacity(fresh.len());
    let mut result = Reconciliation::default();

    for record in fresh {
        let address = record.address();
        if current.contains(&address) || seen.contains(&address) {
            result.to_update.push(record.clone());
        } else {
            result.to_insert.push(record.clone());
        }
        seen.insert(address);
    }

    let mut gone: Vec<&String> = current.difference(&seen).collect();
    // HashSet iteration order is arbitrary; keep removals deterministic.
    gone.sort();
    result.to_remove = gone.into_iter().cloned().collect();

    result
}
