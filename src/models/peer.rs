use std::net::SocketAddr;

/// A peer as reported by the engine on a refresh tick.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerRecord {
    pub endpoint: SocketAddr,
    pub client: String,
    pub progress: f32,
    pub download_rate: i64,
    pub upload_rate: i64,
    pub total_download: i64,
    pub total_upload: i64,
    pub country: Option<String>,
}

impl PeerRecord {
    pub fn new(endpoint: SocketAddr) -> Self {
        Self {
            endpoint,
            client: "".to_string(),
            progress: 0.0,
            download_rate: 0,
            upload_rate: 0,
            total_download: 0,
            total_upload: 0,
            country: None,
        }
    }

    /// Key of the row this record belongs to: the IP without the port.
    pub fn address(&self) -> String {
        self.endpoint.ip().to_string()
    }
}

/// A displayed row. Decoration state survives updates and dies with the row.
#[derive(Clone, Debug)]
pub struct PeerRow {
    pub address: String,
    pub record: PeerRecord,
    pub hostname: Option<String>,
    pub flag: Option<String>,
    pub flag_missing: bool,
}

impl PeerRow {
    pub fn new(record: PeerRecord) -> Self {
        Self {
            address: record.address(),
            record,
            hostname: None,
            flag: None,
            flag_missing: false,
        }
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.record.endpoint
    }

    /// Text of the first column: the resolved hostname, else the IP.
    pub fn display_name(&self) -> &str {
        self.hostname.as_deref().unwrap_or(&self.address)
    }
}
