//! Per-connection handler.
//!
//! ```text
//! Connecting --register + join notice--> Active
//! Active --EOF / read error / line too long / evicted / shutdown--> Closing
//! Closing --unregister + close + leave notice--> Closed
//! ```
//!
//! The Closing → Closed step runs on every exit path of the read loop.

use std::{fmt, sync::Arc};

use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::{
    codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead},
    sync::CancellationToken,
};

use crate::{
    domain::{PeerAddr, PeerHandle},
    infrastructure::{codec, message_pusher::StreamPeerSink},
    ui::state::AppState,
};

/// Lifecycle state of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Active,
    Closing,
    Closed,
}

/// Why the read loop of a connection ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer closed the connection
    EndOfStream,
    /// Reading from the peer failed
    ReadError(String),
    /// The peer sent a line longer than the configured limit
    LineTooLong,
    /// A write to this peer failed and it was evicted from the registry
    Evicted,
    /// The server is shutting down
    Shutdown,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::EndOfStream => f.write_str("end of stream"),
            CloseReason::ReadError(e) => write!(f, "read error: {}", e),
            CloseReason::LineTooLong => f.write_str("line too long"),
            CloseReason::Evicted => f.write_str("evicted after write failure"),
            CloseReason::Shutdown => f.write_str("server shutdown"),
        }
    }
}

struct Connection {
    peer: PeerHandle,
    state: ConnectionState,
}

impl Connection {
    fn transition(&mut self, next: ConnectionState) {
        tracing::debug!(
            "Peer {} ({}): {:?} -> {:?}",
            self.peer.id(),
            self.peer.addr(),
            self.state,
            next
        );
        self.state = next;
    }
}

/// Drive one connection from accept to close.
///
/// # Arguments
///
/// * `reader` - inbound half of the connection
/// * `writer` - outbound half of the connection, owned by the registry entry
/// * `addr` - display identifier of the peer
/// * `state` - shared use cases
/// * `shutdown` - cancelled when the server stops
pub async fn handle_connection<R, W>(
    reader: R,
    writer: W,
    addr: PeerAddr,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> CloseReason
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut connection = Connection {
        peer: PeerHandle::new(addr, Arc::new(StreamPeerSink::new(writer))),
        state: ConnectionState::Connecting,
    };

    state.connect_peer_usecase.execute(&connection.peer).await;
    connection.transition(ConnectionState::Active);

    let mut lines = FramedRead::new(reader, line_codec(state.max_line_length));
    let reason = read_loop(&connection.peer, &mut lines, &state, &shutdown).await;

    connection.transition(ConnectionState::Closing);
    tracing::info!(
        "Closing connection to peer {} ({}): {}",
        connection.peer.id(),
        connection.peer.addr(),
        reason
    );
    state.disconnect_peer_usecase.execute(&connection.peer).await;
    drop(lines);
    connection.transition(ConnectionState::Closed);

    reason
}

/// Newline framing on raw bytes. UTF-8 is checked per record by the codec.
fn line_codec(max_line_length: usize) -> AnyDelimiterCodec {
    AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), b"\n".to_vec(), max_line_length)
}

async fn read_loop<R>(
    peer: &PeerHandle,
    lines: &mut FramedRead<R, AnyDelimiterCodec>,
    state: &AppState,
    shutdown: &CancellationToken,
) -> CloseReason
where
    R: AsyncRead + Unpin,
{
    loop {
        let next = tokio::select! {
            next = lines.next() => next,
            _ = peer.closed() => return CloseReason::Evicted,
            _ = shutdown.cancelled() => return CloseReason::Shutdown,
        };

        let line = match next {
            None => return CloseReason::EndOfStream,
            Some(Ok(line)) => line,
            Some(Err(AnyDelimiterCodecError::MaxChunkLengthExceeded)) => {
                return CloseReason::LineTooLong;
            }
            Some(Err(AnyDelimiterCodecError::Io(e))) => return CloseReason::ReadError(e.to_string()),
        };

        match codec::decode_bytes(&line) {
            Ok(decoded) => {
                state.send_message_usecase.execute(peer, decoded).await;
            }
            Err(e) => {
                tracing::debug!("Discarding line from peer {}: {}", peer.id(), e);
            }
        }
    }
}
