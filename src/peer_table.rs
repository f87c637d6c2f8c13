use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
};

use crate::{
    flags::FlagProvider,
    models::peer::{PeerRecord, PeerRow},
    reconcile::{reconcile, Reconciliation},
};

/// The rows currently on screen, in display order, indexed by address.
///
/// Every mutation goes through this type so that an address is never shown
/// twice and the index never points at a row that is gone.
#[derive(Default)]
pub struct PeerTable {
    rows: Vec<PeerRow>,
    positions: HashMap<String, usize>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[PeerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.positions.contains_key(address)
    }

    pub fn get(&self, address: &str) -> Option<&PeerRow> {
        self.positions.get(address).map(|index| &self.rows[*index])
    }

    pub fn position(&self, address: &str) -> Option<usize> {
        self.positions.get(address).copied()
    }

    /// Live endpoint of a displayed peer, used to target engine calls.
    pub fn endpoint(&self, address: &str) -> Option<SocketAddr> {
        self.get(address).map(|row| row.endpoint())
    }

    pub fn addresses(&self) -> HashSet<String> {
        self.positions.keys().cloned().collect()
    }

    /// Addresses of `selected` that have a row, in display order.
    pub fn selected_in_order(&self, selected: &HashSet<String>) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| selected.contains(&row.address))
            .map(|row| row.address.clone())
            .collect()
    }

    /// Brings the table in line with `fresh` and returns the addresses of the
    /// rows that were created.
    pub fn refresh(
        &mut self,
        fresh: &[PeerRecord],
        flags: Option<&mut dyn FlagProvider>,
    ) -> Vec<String> {
        let reconciliation = reconcile(&self.addresses(), fresh);
        self.apply(reconciliation, flags)
    }

    pub fn apply(
        &mut self,
        reconciliation: Reconciliation,
        mut flags: Option<&mut dyn FlagProvider>,
    ) -> Vec<String> {
        let Reconciliation {
            to_insert,
            to_update,
            to_remove,
        } = reconciliation;

        if !to_remove.is_empty() {
            let gone: HashSet<String> = to_remove.into_iter().collect();
            log::debug!("Removing {} peers", gone.len());
            self.rows.retain(|row| !gone.contains(&row.address));
            self.reindex();
        }

        let mut inserted = Vec::with_capacity(to_insert.len());
        for record in to_insert {
            let mut row = PeerRow::new(record);
            if let Some(flags) = flags.as_deref_mut() {
                decorate(&mut row, flags);
            }
            self.positions.insert(row.address.clone(), self.rows.len());
            inserted.push(row.address.clone());
            self.rows.push(row);
        }

        for record in to_update {
            let Some(index) = self.positions.get(&record.address()).copied() else {
                log::warn!("Update for unknown peer {}", record.address());
                continue;
            };
            let row = &mut self.rows[index];
            row.record = record;
            if let Some(flags) = flags.as_deref_mut() {
                if !row.flag_missing {
                    decorate(row, flags);
                }
            }
        }

        inserted
    }

    /// Applies a reverse DNS result. Returns false when the peer is no longer
    /// displayed and the result was dropped.
    pub fn set_hostname(&mut self, address: &str, hostname: String) -> bool {
        match self.positions.get(address) {
            Some(index) => {
                self.rows[*index].hostname = Some(hostname);
                true
            }
            None => false,
        }
    }

    pub fn clear_hostnames(&mut self) {
        self.rows.iter_mut().for_each(|row| row.hostname = None);
    }

    /// Looks up the flag of every row again, forgetting previous misses.
    pub fn show_flags(&mut self, flags: &mut dyn FlagProvider) {
        for row in self.rows.iter_mut() {
            row.flag_missing = false;
            decorate(row, flags);
        }
    }

    pub fn hide_flags(&mut self) {
        self.rows.iter_mut().for_each(|row| row.flag = None);
    }

    pub fn clear(&mut self) {
        log::debug!("Clearing {} peers", self.rows.len());
        self.rows.clear();
        self.positions.clear();
    }

    fn reindex(&mut self) {
        self.positions = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| (row.address.clone(), index))
            .collect();
    }
}

fn decorate(row: &mut PeerRow, flags: &mut dyn FlagProvider) {
    let uri = row
        .record
        .country
        .as_deref()
        .and_then(|code| flags.flag_uri(code));
    match uri {
        Some(uri) => {
            row.flag = Some(uri);
            row.flag_missing = false;
        }
        None => {
            row.flag = None;
            row.flag_missing = true;
        }
    }
}
