use std::net::SocketAddr;

use thiserror::Error;

use crate::models::peer::PeerRecord;

pub mod simulated;

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("The torrent handle is no longer valid")]
    InvalidHandle,

    #[error("Peer {0} is not connected")]
    PeerNotFound(SocketAddr),

    #[error("The torrent is queued or checking and does not accept peers")]
    NotAcceptingPeers,

    #[error("Could not connect to {0}: {1}")]
    Connect(SocketAddr, String),
}

/// The part of a torrent engine the peer list talks to.
pub trait PeerEngine {
    fn peer_info(&self) -> Result<Vec<PeerRecord>, EngineError>;

    /// False while the torrent is queued or checking its files.
    fn accepts_new_peers(&self) -> bool;

    fn connect_peer(&mut self, endpoint: SocketAddr) -> Result<(), EngineError>;

    fn set_peer_upload_limit(
        &mut self,
        endpoint: SocketAddr,
        bytes_per_sec: i64,
    ) -> Result<(), EngineError>;

    fn set_peer_download_limit(
        &mut self,
        endpoint: SocketAddr,
        bytes_per_sec: i64,
    ) -> Result<(), EngineError>;
}
