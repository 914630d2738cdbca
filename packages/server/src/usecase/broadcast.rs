//! UseCase: ブロードキャスト
//!
//! 1 つのメッセージを、レジストリのスナップショットに含まれる全てのピアに配信します。
//!
//! ## 処理の流れ
//!
//! 1. レジストリのスナップショットを取得（空ならすぐに返る）
//! 2. メッセージを 1 回だけエンコードし、全ピアで共有する
//! 3. 全ピアへ並行に書き込む（ピアごとにタイムアウト付き）
//! 4. 書き込みに失敗したピアをレジストリから削除し、コネクションを閉じる
//!
//! 1 つのピアの失敗や遅延が他のピアへの配信を止めることはありません。

use std::{sync::Arc, time::Duration};

use futures_util::future::join_all;

use crate::{
    domain::{Message, PeerHandle, PeerId, PeerRegistry, PeerWriteError},
    infrastructure::codec,
};

use super::error::BroadcastError;

/// ブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 配信を試みたピア数
    pub attempted: usize,
    /// 配信に成功したピア
    pub delivered: Vec<PeerId>,
    /// 書き込みに失敗して切断したピア
    pub evicted: Vec<PeerId>,
}

/// ブロードキャストのユースケース
pub struct BroadcastUseCase {
    /// 接続中ピアのレジストリ
    registry: Arc<dyn PeerRegistry>,
    /// 1 ピアへの書き込みのタイムアウト
    write_timeout: Duration,
}

impl BroadcastUseCase {
    /// 新しい BroadcastUseCase を作成
    pub fn new(registry: Arc<dyn PeerRegistry>, write_timeout: Duration) -> Self {
        Self {
            registry,
            write_timeout,
        }
    }

    /// ブロードキャストを実行
    ///
    /// # Arguments
    ///
    /// * `message` - 配信するメッセージ（サーバーでタイムスタンプ付与済み）
    /// * `exclude` - 配信対象から除外するピア（送信者本人など）
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 配信結果
    /// * `Err(BroadcastError)` - エンコード失敗（どのピアにも配信していない）
    pub async fn execute(
        &self,
        message: &Message,
        exclude: Option<PeerId>,
    ) -> Result<BroadcastReport, BroadcastError> {
        let targets: Vec<PeerHandle> = self
            .registry
            .snapshot()
            .await
            .into_iter()
            .filter(|peer| Some(peer.id()) != exclude)
            .collect();

        if targets.is_empty() {
            return Ok(BroadcastReport::default());
        }

        let line = codec::encode(message)?;

        let results = join_all(targets.iter().map(|peer| self.send_to(peer, &line))).await;

        let mut report = BroadcastReport {
            attempted: targets.len(),
            ..Default::default()
        };
        let mut failed = Vec::new();
        for (peer, result) in targets.iter().zip(results) {
            match result {
                Ok(()) => report.delivered.push(peer.id()),
                Err(e) => {
                    tracing::warn!(
                        "Failed to deliver message to peer {} ({}): {}",
                        peer.id(),
                        peer.addr(),
                        e
                    );
                    failed.push(peer);
                }
            }
        }

        for peer in failed {
            self.registry.remove(peer.id()).await;
            peer.close().await;
            tracing::info!("Evicted peer {} ({})", peer.id(), peer.addr());
            report.evicted.push(peer.id());
        }

        tracing::debug!(
            "Broadcast from '{}' delivered to {}/{} peers",
            message.sender,
            report.delivered.len(),
            report.attempted
        );

        Ok(report)
    }

    async fn send_to(&self, peer: &PeerHandle, line: &str) -> Result<(), PeerWriteError> {
        match tokio::time::timeout(self.write_timeout, peer.send_line(line)).await {
            Ok(result) => result,
            Err(_) => Err(PeerWriteError::Timeout(self.write_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PeerAddr, PeerSink, Timestamp},
        infrastructure::{codec::decode, repository::InMemoryPeerRegistry},
        usecase::testing::{BrokenSink, RecordingSink, StalledSink},
    };
    use linecast_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - BroadcastUseCase::execute の配信とピアの切断
    //
    // 【なぜこのテストが必要か】
    // - 1 つのピアの失敗が他のピアへの配信に影響しないことを保証する
    // - 失敗したピアがレジストリから取り除かれる（自己修復）ことを保証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. N ピアへの配信（N 回の書き込み）
    // 2. 一部のピアの書き込み失敗
    // 3. 応答しないピアのタイムアウト
    // 4. 空のレジストリ
    // 5. 送信者の除外
    // 6. 連続したブロードキャストの順序
    // ========================================

    const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

    fn message(body: &str) -> Message {
        Message::chat(
            "alice",
            body,
            Timestamp::now(&FixedClock::from_millis(1672531200000)),
        )
    }

    fn create_usecase() -> (BroadcastUseCase, Arc<InMemoryPeerRegistry>) {
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let usecase = BroadcastUseCase::new(registry.clone(), WRITE_TIMEOUT);
        (usecase, registry)
    }

    async fn register(registry: &InMemoryPeerRegistry, sink: Arc<dyn PeerSink>) -> PeerHandle {
        let peer = PeerHandle::new(PeerAddr::new("127.0.0.1:50000"), sink);
        registry.add(peer.clone()).await;
        peer
    }

    #[tokio::test]
    async fn test_broadcast_delivers_to_every_peer() {
        // テスト項目: 登録済みの N ピアそれぞれに 1 回ずつ配信される
        // given (前提条件):
        let (usecase, registry) = create_usecase();
        let sinks: Vec<Arc<RecordingSink>> =
            (0..3).map(|_| Arc::new(RecordingSink::default())).collect();
        for sink in &sinks {
            register(&registry, sink.clone()).await;
        }

        // when (操作):
        let report = usecase.execute(&message("hello"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered.len(), 3);
        assert!(report.evicted.is_empty());
        for sink in &sinks {
            let lines = sink.lines().await;
            assert_eq!(lines.len(), 1);
            assert_eq!(decode(&lines[0]).unwrap().body.as_deref(), Some("hello"));
        }
    }

    #[tokio::test]
    async fn test_broadcast_evicts_failed_peer_and_continues() {
        // テスト項目: 書き込みに失敗したピアは切断され、残りのピアには配信される
        // given (前提条件):
        let (usecase, registry) = create_usecase();
        let alice = Arc::new(RecordingSink::default());
        let broken = Arc::new(BrokenSink::default());
        let bob = Arc::new(RecordingSink::default());
        register(&registry, alice.clone()).await;
        let broken_peer = register(&registry, broken.clone()).await;
        register(&registry, bob.clone()).await;

        // when (操作):
        let report = usecase.execute(&message("hello"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered.len(), 2);
        assert_eq!(report.evicted, vec![broken_peer.id()]);
        assert_eq!(alice.lines().await.len(), 1);
        assert_eq!(bob.lines().await.len(), 1);
        assert_eq!(broken.attempts(), 1);
        assert!(broken.is_closed());
        assert!(broken_peer.is_closed());
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_broadcast_evicts_stalled_peer_after_timeout() {
        // テスト項目: 応答しないピアはタイムアウト後に切断され、他のピアの配信を妨げない
        // given (前提条件):
        let (usecase, registry) = create_usecase();
        let stalled_peer = register(&registry, Arc::new(StalledSink)).await;
        let alice = Arc::new(RecordingSink::default());
        register(&registry, alice.clone()).await;

        // when (操作):
        let report = usecase.execute(&message("hello"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.evicted, vec![stalled_peer.id()]);
        assert_eq!(alice.lines().await.len(), 1);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_registry_is_noop() {
        // テスト項目: ピアがいない場合は何もせずに返る
        // given (前提条件):
        let (usecase, _registry) = create_usecase();

        // when (操作):
        let report = usecase.execute(&message("hello"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_broadcast_skips_excluded_peer() {
        // テスト項目: 除外したピア（送信者）には配信されない
        // given (前提条件):
        let (usecase, registry) = create_usecase();
        let sender = Arc::new(RecordingSink::default());
        let receiver = Arc::new(RecordingSink::default());
        let sender_peer = register(&registry, sender.clone()).await;
        register(&registry, receiver.clone()).await;

        // when (操作):
        let report = usecase
            .execute(&message("hello"), Some(sender_peer.id()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.attempted, 1);
        assert!(sender.lines().await.is_empty());
        assert_eq!(receiver.lines().await.len(), 1);
    }

    #[tokio::test]
    async fn test_removed_peer_receives_nothing() {
        // テスト項目: レジストリから削除されたピアには以降配信されない
        // given (前提条件):
        let (usecase, registry) = create_usecase();
        let alice = Arc::new(RecordingSink::default());
        let bob = Arc::new(RecordingSink::default());
        register(&registry, alice.clone()).await;
        let bob_peer = register(&registry, bob.clone()).await;
        registry.remove(bob_peer.id()).await;

        // when (操作):
        let report = usecase.execute(&message("hello"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(report.attempted, 1);
        assert!(bob.lines().await.is_empty());
        assert_eq!(alice.lines().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sequential_broadcasts_keep_order() {
        // テスト項目: 連続してブロードキャストしたメッセージは全ピアで同じ順序になる
        // given (前提条件):
        let (usecase, registry) = create_usecase();
        let sinks: Vec<Arc<RecordingSink>> =
            (0..4).map(|_| Arc::new(RecordingSink::default())).collect();
        for sink in &sinks {
            register(&registry, sink.clone()).await;
        }

        // when (操作):
        for i in 0..10 {
            usecase
                .execute(&message(&format!("message {}", i)), None)
                .await
                .unwrap();
        }

        // then (期待する結果):
        let expected: Vec<String> = (0..10).map(|i| format!("message {}", i)).collect();
        for sink in &sinks {
            let bodies: Vec<String> = sink
                .lines()
                .await
                .iter()
                .filter_map(|line| decode(line).ok().and_then(|m| m.body))
                .collect();
            assert_eq!(bodies, expected);
        }
    }
}
