//! Peer model: one connected client as seen by the server.

use std::{
    fmt,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio_util::sync::CancellationToken;

use super::{PeerSink, PeerWriteError};

static NEXT_PEER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a peer, assigned in accept order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(u64);

impl PeerId {
    /// Allocate the next identifier
    pub fn next() -> Self {
        Self(NEXT_PEER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display identifier of a peer (remote address)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerAddr(String);

impl PeerAddr {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<SocketAddr> for PeerAddr {
    fn from(addr: SocketAddr) -> Self {
        Self(addr.to_string())
    }
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry entry for a live peer
///
/// Cloning is cheap: clones share the same sink and the same close token.
/// Once [`PeerHandle::close`] has been called by any holder, every clone
/// observes [`PeerHandle::is_closed`] and [`PeerHandle::closed`] resolves.
#[derive(Clone)]
pub struct PeerHandle {
    id: PeerId,
    addr: PeerAddr,
    sink: Arc<dyn PeerSink>,
    closed: CancellationToken,
}

impl PeerHandle {
    pub fn new(addr: PeerAddr, sink: Arc<dyn PeerSink>) -> Self {
        Self {
            id: PeerId::next(),
            addr,
            sink,
            closed: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    pub fn addr(&self) -> &PeerAddr {
        &self.addr
    }

    /// Write one encoded line to the peer
    pub async fn send_line(&self, line: &str) -> Result<(), PeerWriteError> {
        if self.is_closed() {
            return Err(PeerWriteError::Closed);
        }
        self.sink.send_line(line).await
    }

    /// Release the outbound half and wake up whoever waits on [`PeerHandle::closed`].
    ///
    /// Calling it more than once is harmless.
    pub async fn close(&self) {
        self.closed.cancel();
        self.sink.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once the peer has been closed
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }
}

impl fmt::Debug for PeerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerHandle")
            .field("id", &self.id)
            .field("addr", &self.addr)
            .field("closed", &self.is_closed())
            .finish()
    }
}
