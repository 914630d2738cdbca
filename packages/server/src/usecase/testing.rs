//! UseCase / Infrastructure のテスト用の PeerSink・HistoryStore 実装

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{HistoryError, HistoryStore, Message, PeerSink, PeerWriteError};

/// 書き込まれた行を記録する sink
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl RecordingSink {
    pub async fn lines(&self) -> Vec<String> {
        self.lines.lock().await.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PeerSink for RecordingSink {
    async fn send_line(&self, line: &str) -> Result<(), PeerWriteError> {
        self.lines.lock().await.push(line.to_string());
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// 常に書き込みに失敗する sink（切断済みのピア）
#[derive(Default)]
pub struct BrokenSink {
    attempts: AtomicUsize,
    closed: AtomicBool,
}

impl BrokenSink {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PeerSink for BrokenSink {
    async fn send_line(&self, _line: &str) -> Result<(), PeerWriteError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(PeerWriteError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "broken pipe",
        )))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// 書き込みが完了しない sink（応答しない遅いピア）
#[derive(Default)]
pub struct StalledSink;

#[async_trait]
impl PeerSink for StalledSink {
    async fn send_line(&self, _line: &str) -> Result<(), PeerWriteError> {
        std::future::pending::<()>().await;
        Ok(())
    }

    async fn close(&self) {}
}

/// 追記されたメッセージをメモリに記録する HistoryStore
#[derive(Default)]
pub struct InMemoryHistory {
    messages: Mutex<Vec<Message>>,
}

impl InMemoryHistory {
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, message: &Message) -> Result<(), HistoryError> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }
}
