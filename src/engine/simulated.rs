use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::{EngineError, PeerEngine};
use crate::models::peer::PeerRecord;

const CLIENTS: [&str; 6] = [
    "qBittorrent 4.6.2",
    "Transmission 4.0.5",
    "Deluge 2.1.1",
    "libtorrent (Rasterbar) 2.0.9",
    "µTorrent 3.6.0",
    "BiglyBT 3.5.0.0",
];
const COUNTRIES: [&str; 10] = ["de", "us", "fr", "jp", "br", "nl", "se", "ca", "in", "xx"];
const MAX_PEERS: usize = 40;

struct SimulatedPeer {
    record: PeerRecord,
    upload_limit: i64,
    download_limit: i64,
}

/// A swarm that drifts on every `tick`: peers come and go and their rates
/// wander, honouring the per-peer limits that were set.
pub struct SimulatedEngine {
    peers: Vec<SimulatedPeer>,
    rng: StdRng,
    accepts_new_peers: bool,
}

impl SimulatedEngine {
    pub fn new(seed: u64, initial_peers: usize) -> Self {
        let mut engine = Self::with_peers(vec![]);
        engine.rng = StdRng::seed_from_u64(seed);
        for _ in 0..initial_peers.min(MAX_PEERS) {
            let record = engine.random_peer();
            engine.push(record);
        }
        engine
    }

    pub fn with_peers(records: Vec<PeerRecord>) -> Self {
        let mut engine = Self {
            peers: vec![],
            rng: StdRng::seed_from_u64(0),
            accepts_new_peers: true,
        };
        records.into_iter().for_each(|record| engine.push(record));
        engine
    }

    pub fn set_accepts_new_peers(&mut self, accepts: bool) {
        self.accepts_new_peers = accepts;
    }

    /// Drops every connection coming from `ip`.
    #[cfg(test)]
    pub fn disconnect(&mut self, ip: IpAddr) {
        self.peers.retain(|p| p.record.endpoint.ip() != ip);
    }

    /// Limits in effect for a connection, as `(upload, download)`.
    #[cfg(test)]
    pub fn limits(&self, endpoint: SocketAddr) -> Option<(i64, i64)> {
        self.find(endpoint)
            .map(|p| (p.upload_limit, p.download_limit))
    }

    pub fn tick(&mut self) {
        if !self.peers.is_empty() && self.rng.gen_bool(0.1) {
            let index = self.rng.gen_range(0..self.peers.len());
            let gone = self.peers.remove(index);
            log::debug!("Simulated peer {} left", gone.record.endpoint);
        }
        if self.peers.len() < MAX_PEERS && self.rng.gen_bool(0.15) {
            let record = self.random_peer();
            log::debug!("Simulated peer {} joined", record.endpoint);
            self.push(record);
        }

        let rng = &mut self.rng;
        for peer in self.peers.iter_mut() {
            let record = &mut peer.record;
            record.download_rate =
                drift(rng, record.download_rate, peer.download_limit);
            record.upload_rate = drift(rng, record.upload_rate, peer.upload_limit);
            record.total_download += record.download_rate;
            record.total_upload += record.upload_rate;
            record.progress = (record.progress + rng.gen_range(0.0..0.01)).min(1.0);
        }
    }

    fn push(&mut self, record: PeerRecord) {
        self.peers.push(SimulatedPeer {
            record,
            upload_limit: -1,
            download_limit: -1,
        });
    }

    fn find(&self, endpoint: SocketAddr) -> Option<&SimulatedPeer> {
        self.peers.iter().find(|p| p.record.endpoint == endpoint)
    }

    fn find_mut(&mut self, endpoint: SocketAddr) -> Option<&mut SimulatedPeer> {
        self.peers.iter_mut().find(|p| p.record.endpoint == endpoint)
    }

    fn random_peer(&mut self) -> PeerRecord {
        let ip = Ipv4Addr::new(
            self.rng.gen_range(1..224),
            self.rng.gen(),
            self.rng.gen(),
            self.rng.gen_range(1..255),
        );
        let port = self.rng.gen_range(1024..65535);
        let mut record = PeerRecord::new(SocketAddr::new(IpAddr::V4(ip), port));
        record.client = CLIENTS
            .choose(&mut self.rng)
            .map(|c| c.to_string())
            .unwrap_or_default();
        record.progress = self.rng.gen_range(0.0..1.0);
        record.country = if self.rng.gen_bool(0.9) {
            COUNTRIES.choose(&mut self.rng).map(|c| c.to_string())
        } else {
            None
        };
        record
    }
}

fn drift(rng: &mut StdRng, rate: i64, limit: i64) -> i64 {
    let rate = (rate + rng.gen_range(-50_000..60_000)).max(0);
    if limit > 0 {
        rate.min(limit)
    } else {
        rate
    }
}

impl PeerEngine for SimulatedEngine {
    fn peer_info(&self) -> Result<Vec<PeerRecord>, EngineError> {
        Ok(self.peers.iter().map(|p| p.record.clone()).collect())
    }

    fn accepts_new_peers(&self) -> bool {
        self.accepts_new_peers
    }

    fn connect_peer(&mut self, endpoint: SocketAddr) -> Result<(), EngineError> {
        if !self.accepts_new_peers {
            return Err(EngineError::NotAcceptingPeers);
        }
        if endpoint.port() == 0 || endpoint.ip().is_unspecified() {
            return Err(EngineError::Connect(endpoint, "invalid endpoint".into()));
        }
        if self.find(endpoint).is_some() {
            return Err(EngineError::Connect(endpoint, "already connected".into()));
        }

        let mut record = PeerRecord::new(endpoint);
        record.client = "Unknown".to_string();
        self.push(record);
        Ok(())
    }

    fn set_peer_upload_limit(
        &mut self,
        endpoint: SocketAddr,
        bytes_per_sec: i64,
    ) -> Result<(), EngineError> {
        let peer = self
            .find_mut(endpoint)
            .ok_or(EngineError::PeerNotFound(endpoint))?;
        peer.upload_limit = bytes_per_sec;
        Ok(())
    }

    fn set_peer_download_limit(
        &mut self,
        endpoint: SocketAddr,
        bytes_per_sec: i64,
    ) -> Result<(), EngineError> {
        let peer = self
            .find_mut(endpoint)
            .ok_or(EngineError::PeerNotFound(endpoint))?;
        peer.download_limit = bytes_per_sec;
        Ok(())
    }
}
