//! UseCase: クライアントからのメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 受信したメッセージの正規化（デフォルト値、サーバー時刻の付与）と中継
//!
//! ### なぜこのテストが必要か
//! - クライアントが送ったタイムスタンプは必ずサーバー時刻で上書きされることを保証
//! - 送信者本人には配信されず、他の全てのピアに配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：text だけのメッセージ（送信者はピアのアドレスになる）
//! - 正常系：送信者名付きのメッセージ

use std::sync::Arc;

use linecast_shared::time::Clock;

use crate::domain::{DecodedMessage, PeerHandle, Timestamp};

use super::relay_message::{RelayMessageUseCase, RelayOutcome};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// RelayMessageUseCase（配信 + 履歴）
    relay: Arc<RelayMessageUseCase>,
    /// タイムスタンプ付与に使う時計
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(relay: Arc<RelayMessageUseCase>, clock: Arc<dyn Clock>) -> Self {
        Self { relay, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - メッセージを送ってきたピア
    /// * `decoded` - decode 済みのメッセージ（タイムスタンプ未付与）
    pub async fn execute(&self, from: &PeerHandle, decoded: DecodedMessage) -> RelayOutcome {
        let message = decoded.normalize(from.addr().as_str(), Timestamp::now(self.clock.as_ref()));
        tracing::debug!(
            "Relaying message from '{}' ({}), {} bytes",
            message.sender,
            from.addr(),
            message.body.len()
        );
        self.relay.execute(message, Some(from.id())).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        domain::{MessageKind, PeerAddr, PeerRegistry},
        infrastructure::{codec::decode, repository::InMemoryPeerRegistry},
        usecase::{
            broadcast::BroadcastUseCase,
            testing::{InMemoryHistory, RecordingSink},
        },
    };
    use linecast_shared::time::FixedClock;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    struct Fixture {
        usecase: SendMessageUseCase,
        history: Arc<InMemoryHistory>,
        sender: (PeerHandle, Arc<RecordingSink>),
        receiver: Arc<RecordingSink>,
    }

    async fn create_fixture() -> Fixture {
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let history = Arc::new(InMemoryHistory::default());
        let broadcast = Arc::new(BroadcastUseCase::new(
            registry.clone(),
            Duration::from_secs(1),
        ));
        let relay = Arc::new(RelayMessageUseCase::new(broadcast, history.clone()));
        let clock = Arc::new(FixedClock::from_millis(1672531200000));
        let usecase = SendMessageUseCase::new(relay, clock);

        let sender_sink = Arc::new(RecordingSink::default());
        let sender = PeerHandle::new(PeerAddr::new("127.0.0.1:50001"), sender_sink.clone());
        let receiver = Arc::new(RecordingSink::default());
        registry.add(sender.clone()).await;
        registry
            .add(PeerHandle::new(
                PeerAddr::new("127.0.0.1:50002"),
                receiver.clone(),
            ))
            .await;

        Fixture {
            usecase,
            history,
            sender: (sender, sender_sink),
            receiver,
        }
    }

    #[tokio::test]
    async fn test_text_only_message_is_stamped_and_relayed() {
        // テスト項目: text だけのメッセージは送信者がアドレスになり、サーバー時刻が付与される
        // given (前提条件):
        let fixture = create_fixture().await;
        let decoded = decode(r#"{"text":"hi","timestamp":"1999-01-01T00:00:00Z"}"#).unwrap();

        // when (操作):
        let outcome = fixture.usecase.execute(&fixture.sender.0, decoded).await;

        // then (期待する結果):
        assert!(outcome.logged);
        let logged = fixture.history.messages().await;
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].kind, MessageKind::Chat);
        assert_eq!(logged[0].sender, "127.0.0.1:50001");
        assert_eq!(logged[0].body, "hi");
        assert_eq!(logged[0].timestamp.to_iso8601(), "2023-01-01T00:00:00.000000Z");

        let received = fixture.receiver.lines().await;
        assert_eq!(received.len(), 1);
        assert!(received[0].contains("\"timestamp\":\"2023-01-01T00:00:00.000000Z\""));
    }

    #[tokio::test]
    async fn test_message_is_not_echoed_to_sender() {
        // テスト項目: 送信者本人にはメッセージが配信されない
        // given (前提条件):
        let fixture = create_fixture().await;
        let decoded = decode(r#"{"type":"message","from":"alice","text":"hello"}"#).unwrap();

        // when (操作):
        fixture.usecase.execute(&fixture.sender.0, decoded).await;

        // then (期待する結果):
        assert!(fixture.sender.1.lines().await.is_empty());
        let received = fixture.receiver.lines().await;
        let relayed = decode(&received[0]).unwrap();
        assert_eq!(relayed.sender.as_deref(), Some("alice"));
        assert_eq!(relayed.body.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_message_body_is_not_written_to_process_log() {
        // テスト項目: 中継したメッセージの本文はプロセスのログに出力されない
        // given (前提条件):
        let fixture = create_fixture().await;
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);
        let decoded = decode(r#"{"from":"alice","text":"my private words"}"#).unwrap();

        // when (操作):
        fixture.usecase.execute(&fixture.sender.0, decoded).await;

        // then (期待する結果):
        let output = logs.contents();
        assert!(output.contains("Relaying message from 'alice'"));
        assert!(!output.contains("my private words"));
    }
}
