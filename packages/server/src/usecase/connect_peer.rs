//! UseCase: ピア接続処理
//!
//! ピアをレジストリに登録し、参加通知（system メッセージ）を中継します。
//! 参加通知は参加したピア本人には配信されません。

use std::sync::Arc;

use linecast_shared::time::Clock;

use crate::domain::{Message, PeerHandle, PeerRegistry, Timestamp};

use super::relay_message::{RelayMessageUseCase, RelayOutcome};

/// ピア接続のユースケース
pub struct ConnectPeerUseCase {
    /// PeerRegistry（接続中ピアの管理）
    registry: Arc<dyn PeerRegistry>,
    /// RelayMessageUseCase（配信 + 履歴）
    relay: Arc<RelayMessageUseCase>,
    /// タイムスタンプ付与に使う時計
    clock: Arc<dyn Clock>,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(
        registry: Arc<dyn PeerRegistry>,
        relay: Arc<RelayMessageUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            relay,
            clock,
        }
    }

    /// ピア接続を実行
    pub async fn execute(&self, peer: &PeerHandle) -> RelayOutcome {
        self.registry.add(peer.clone()).await;
        tracing::info!("Peer {} ({}) connected", peer.id(), peer.addr());

        let notice = Message::system(
            format!("{} joined", peer.addr()),
            Timestamp::now(self.clock.as_ref()),
        );
        self.relay.execute(notice, Some(peer.id())).await
    }
}
