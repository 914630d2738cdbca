//! UseCase: ピア切断処理
//!
//! ピアをレジストリから削除し（冪等）、コネクションを閉じてから
//! 退出通知（system メッセージ）を残りのピアに中継します。

use std::sync::Arc;

use linecast_shared::time::Clock;

use crate::domain::{Message, PeerHandle, PeerRegistry, Timestamp};

use super::relay_message::{RelayMessageUseCase, RelayOutcome};

/// ピア切断のユースケース
pub struct DisconnectPeerUseCase {
    /// PeerRegistry（接続中ピアの管理）
    registry: Arc<dyn PeerRegistry>,
    /// RelayMessageUseCase（配信 + 履歴）
    relay: Arc<RelayMessageUseCase>,
    /// タイムスタンプ付与に使う時計
    clock: Arc<dyn Clock>,
}

impl DisconnectPeerUseCase {
    /// 新しい DisconnectPeerUseCase を作成
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

    /// ピア切断を実行
    ///
    /// ブロードキャスト中に既に切断されていたピアに対して呼んでも問題ない。
    pub async fn execute(&self, peer: &PeerHandle) -> RelayOutcome {
        if self.registry.remove(peer.id()).await.is_none() {
            tracing::debug!("Peer {} was already unregistered", peer.id());
        }
        peer.close().await;
        tracing::info!("Peer {} ({}) disconnected", peer.id(), peer.addr());

        let notice = Message::system(
            format!("{} left", peer.addr()),
            Timestamp::now(self.clock.as_ref()),
        );
        self.relay.execute(notice, Some(peer.id())).await
    }
}
