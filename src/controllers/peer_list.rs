use std::{collections::HashSet, net::SocketAddr, time::Instant};

use egui_toast::{ToastKind, Toasts};

use crate::{
    engine::{EngineError, PeerEngine},
    flags::FlagProvider,
    models::{
        message::{LimitDirection, PeerListAction},
        settings::Preferences,
    },
    peer_table::PeerTable,
    resolver::ReverseResolver,
    toasts,
};

const REFRESH_INTERVAL_SECS: f32 = 0.9;

/// Result of applying one rate limit to a batch of selected peers.
#[derive(Debug, Default, PartialEq)]
pub struct LimitReport {
    pub applied: Vec<String>,
    /// Peers that disconnected between selection and application.
    pub skipped: Vec<String>,
    pub failed: Vec<(String, EngineError)>,
}

/// Owns the displayed peers and everything that mutates them. Lives on the
/// UI thread; only the reverse resolver works elsewhere.
pub struct PeerListController {
    pub table: PeerTable,
    pub selected: HashSet<String>,
    flags: Box<dyn FlagProvider>,
    display_flags: bool,
    resolver: Option<ReverseResolver>,
    start_resolver: Box<dyn Fn() -> ReverseResolver>,
    last_refresh: Option<Instant>,
}

impl PeerListController {
    pub fn new(
        flags: Box<dyn FlagProvider>,
        start_resolver: Box<dyn Fn() -> ReverseResolver>,
        preferences: &Preferences,
    ) -> Self {
        let mut controller = Self {
            table: PeerTable::new(),
            selected: HashSet::new(),
            flags,
            display_flags: false,
            resolver: None,
            start_resolver,
            last_refresh: None,
        };
        controller.set_display_flags(preferences.resolve_countries);
        controller.set_resolve_hostnames(preferences.resolve_hostnames);
        controller
    }

    pub fn resolves_hostnames(&self) -> bool {
        self.resolver.is_some()
    }

    /// Called every frame. Applies finished lookups and refreshes the table
    /// when the refresh interval has passed.
    pub fn update(&mut self, engine: &dyn PeerEngine) {
        self.apply_resolved();

        let due = match self.last_refresh {
            Some(last) => last.elapsed().as_secs_f32() >= REFRESH_INTERVAL_SECS,
            None => true,
        };
        if due {
            self.refresh(engine);
        }
    }

    /// Makes the next `update` refresh regardless of the interval.
    pub fn force_refresh(&mut self) {
        self.last_refresh = None;
    }

    pub fn refresh(&mut self, engine: &dyn PeerEngine) {
        self.last_refresh = Some(Instant::now());

        let peers = match engine.peer_info() {
            Ok(peers) => peers,
            Err(EngineError::InvalidHandle) => {
                self.table.clear();
                self.selected.clear();
                return;
            }
            Err(err) => {
                log::warn!("Failed to fetch peers: {}", err);
                return;
            }
        };

        let flags: Option<&mut dyn FlagProvider> = if self.display_flags {
            Some(self.flags.as_mut())
        } else {
            None
        };
        let inserted = self.table.refresh(&peers, flags);

        if let Some(resolver) = &self.resolver {
            for address in &inserted {
                if let Some(endpoint) = self.table.endpoint(address) {
                    resolver.resolve(endpoint.ip());
                }
            }
        }

        let table = &self.table;
        self.selected.retain(|address| table.contains(address));
    }

    pub fn apply_resolved(&mut self) {
        let Some(resolver) = &self.resolver else {
            return;
        };
        for resolved in resolver.drain() {
            if !self.table.set_hostname(&resolved.address, resolved.hostname) {
                log::debug!("Dropping hostname of departed peer {}", resolved.address);
            }
        }
    }

    /// Starts or stops reverse DNS. Turning it off forgets every hostname so
    /// turning it back on resolves all displayed peers again.
    pub fn set_resolve_hostnames(&mut self, enabled: bool) {
        match (enabled, self.resolver.is_some()) {
            (true, false) => {
                self.resolver = Some((self.start_resolver)());
                self.resolve_all();
            }
            (false, true) => {
                self.resolver = None;
                self.table.clear_hostnames();
                log::info!("Peer hostname resolution disabled");
            }
            _ => {}
        }
    }

    fn resolve_all(&self) {
        if let Some(resolver) = &self.resolver {
            for row in self.table.rows() {
                resolver.resolve(row.endpoint().ip());
            }
        }
    }

    pub fn set_display_flags(&mut self, enabled: bool) {
        if enabled == self.display_flags {
            return;
        }
        self.display_flags = enabled;
        if enabled {
            self.table.show_flags(self.flags.as_mut());
            self.resolve_all();
        } else {
            self.table.hide_flags();
        }
    }

    pub fn add_peer(
        &mut self,
        engine: &mut dyn PeerEngine,
        endpoint: SocketAddr,
    ) -> Result<(), EngineError> {
        engine.connect_peer(endpoint)?;
        log::info!("Added peer {}", endpoint);
        self.force_refresh();
        Ok(())
    }

    /// Applies `limit` to every address that still has a live endpoint.
    /// `None` means the user cancelled and nothing is applied.
    pub fn limit_peers(
        &self,
        engine: &mut dyn PeerEngine,
        direction: LimitDirection,
        addresses: &[String],
        limit: Option<i64>,
    ) -> Option<LimitReport> {
        let Some(limit) = limit else {
            log::debug!("No {} limit was set", direction);
            return None;
        };

        let mut report = LimitReport::default();
        for address in addresses {
            let Some(endpoint) = self.table.endpoint(address) else {
                log::debug!("The selected peer {} no longer exists", address);
                report.skipped.push(address.clone());
                continue;
            };

            log::debug!(
                "Setting {} limit of {:.1} KiB/s to peer {}",
                direction,
                limit as f64 / 1024.0,
                address
            );
            let res = match direction {
                LimitDirection::Upload => engine.set_peer_upload_limit(endpoint, limit),
                LimitDirection::Download => engine.set_peer_download_limit(endpoint, limit),
            };
            match res {
                Ok(()) => report.applied.push(address.clone()),
                Err(err) => {
                    log::error!(
                        "Impossible to apply {} limit to peer {}: {}",
                        direction,
                        address,
                        err
                    );
                    report.failed.push((address.clone(), err));
                }
            }
        }
        Some(report)
    }

    /// Runs an action that needs no further input from the user.
    pub fn process(
        &mut self,
        engine: &mut dyn PeerEngine,
        action: PeerListAction,
        toasts: &mut Toasts,
    ) {
        match action {
            PeerListAction::AddPeer(endpoint) => match self.add_peer(engine, endpoint) {
                Ok(()) => toasts::notify(
                    toasts,
                    ToastKind::Success,
                    "The peer was added to this torrent.",
                ),
                Err(err) => {
                    log::warn!("Failed to add peer {}: {}", endpoint, err);
                    toasts::notify(
                        toasts,
                        ToastKind::Error,
                        "The peer could not be added to this torrent.",
                    );
                }
            },
            PeerListAction::Limit(direction, addresses, limit) => {
                if let Some(report) = self.limit_peers(engine, direction, &addresses, limit) {
                    log::info!(
                        "{} limit applied to {} peers ({} gone, {} failed)",
                        direction,
                        report.applied.len(),
                        report.skipped.len(),
                        report.failed.len()
                    );
                    toasts::notify(
                        toasts,
                        ToastKind::Info,
                        format!(
                            "Rate limit applied to {} of {} peers.",
                            report.applied.len(),
                            addresses.len()
                        ),
                    );
                }
            }
            PeerListAction::PromptAddPeer | PeerListAction::PromptLimit(..) => {
                log::warn!("{:?} needs a dialog and cannot be processed directly", action);
            }
        }
    }
}
