use std::{fmt, net::SocketAddr};

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum LimitDirection {
    Upload,
    Download,
}

impl fmt::Display for LimitDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match self {
            LimitDirection::Upload => "upload",
            LimitDirection::Download => "download",
        };
        write!(f, "{}", str)
    }
}

/// What the user asked for from the peer list context menu or its dialogs.
#[derive(PartialEq, Clone, Debug)]
pub enum PeerListAction {
    /// Open the dialog asking for a peer endpoint.
    PromptAddPeer,
    AddPeer(SocketAddr),
    /// Open the speed limit dialog for the selected peers.
    PromptLimit(LimitDirection, Vec<String>),
    /// `None` means the dialog was cancelled.
    Limit(LimitDirection, Vec<String>, Option<i64>),
}
