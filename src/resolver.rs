use std::{
    io,
    net::IpAddr,
    num::NonZeroUsize,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use lru::LruCache;

const CACHE_SIZE: usize = 500;

/// Reverse lookup of a single address. Runs on the resolver thread.
pub trait HostLookup: Send + 'static {
    fn lookup(&self, ip: IpAddr) -> io::Result<String>;
}

/// Reverse DNS through the system resolver.
pub struct SystemLookup;

impl HostLookup for SystemLookup {
    fn lookup(&self, ip: IpAddr) -> io::Result<String> {
        dns_lookup::lookup_addr(&ip)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Resolved {
    pub address: String,
    pub hostname: String,
}

/// Background worker turning peer IPs into hostnames.
///
/// Requests go in through `resolve`, results come back through `drain` on
/// the UI thread. Dropping the resolver closes the request channel and the
/// worker exits after its current lookup; whatever it was doing is lost.
pub struct ReverseResolver {
    requests: Sender<IpAddr>,
    results: Receiver<Resolved>,
}

impl ReverseResolver {
    pub fn start<L: HostLookup>(lookup: L) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<IpAddr>();
        let (result_tx, result_rx) = mpsc::channel::<Resolved>();

        thread::spawn(move || {
            let capacity = NonZeroUsize::new(CACHE_SIZE).expect("capacity must be non-zero");
            let mut cache: LruCache<IpAddr, String> = LruCache::new(capacity);

            while let Ok(ip) = request_rx.recv() {
                let hostname = match cache.get(&ip) {
                    Some(hostname) => hostname.clone(),
                    None => match lookup.lookup(ip) {
                        Ok(hostname) => {
                            cache.put(ip, hostname.clone());
                            hostname
                        }
                        Err(err) => {
                            log::debug!("Reverse lookup of {} failed: {}", ip, err);
                            continue;
                        }
                    },
                };

                let address = ip.to_string();
                if hostname.is_empty() || hostname == address {
                    continue;
                }
                if result_tx.send(Resolved { address, hostname }).is_err() {
                    break;
                }
            }
            log::debug!("Reverse resolver stopped");
        });
        log::info!("Reverse resolver started");

        Self {
            requests: request_tx,
            results: result_rx,
        }
    }

    /// Queues a lookup. Fire and forget.
    pub fn resolve(&self, ip: IpAddr) {
        if self.requests.send(ip).is_err() {
            log::warn!("Reverse resolver is gone, dropping request for {}", ip);
        }
    }

    /// Everything resolved since the last call, without blocking.
    pub fn drain(&self) -> Vec<Resolved> {
        self.results.try_iter().collect()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Resolved> {
        self.results.recv_timeout(timeout).ok()
    }
}
