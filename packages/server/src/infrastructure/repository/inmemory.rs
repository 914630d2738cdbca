//! InMemory PeerRegistry 実装
//!
//! ドメイン層が定義する PeerRegistry trait の具体的な実装。
//! `BTreeMap<PeerId, PeerHandle>` をインメモリのストアとして使用します。
//! PeerId は接続順に払い出されるため、スナップショットは接続順に並びます。

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PeerHandle, PeerId, PeerRegistry};

/// インメモリ PeerRegistry 実装
///
/// ロックはハンドルの追加・削除・クローン中のみ保持し、ネットワーク書き込み中は保持しない。
#[derive(Default)]
pub struct InMemoryPeerRegistry {
    peers: Mutex<BTreeMap<PeerId, PeerHandle>>,
}

impl InMemoryPeerRegistry {
    /// 新しい InMemoryPeerRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PeerRegistry for InMemoryPeerRegistry {
    async fn add(&self, peer: PeerHandle) {
        if peer.is_closed() {
            tracing::warn!(
                "Peer {} ({}) is already closed, not registering",
                peer.id(),
                peer.addr()
            );
            return;
        }
        let mut peers = self.peers.lock().await;
        tracing::debug!("Peer {} ({}) registered", peer.id(), peer.addr());
        peers.insert(peer.id(), peer);
    }

    async fn remove(&self, id: PeerId) -> Option<PeerHandle> {
        let mut peers = self.peers.lock().await;
        let removed = peers.remove(&id);
        if removed.is_some() {
            tracing::debug!("Peer {} unregistered", id);
        }
        removed
    }

    async fn snapshot(&self) -> Vec<PeerHandle> {
        let peers = self.peers.lock().await;
        peers.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        let peers = self.peers.lock().await;
        peers.len()
    }
}
