//! `AsyncWrite` を使った PeerSink 実装
//!
//! ## 責務
//!
//! - コネクションの送信側半分（`OwnedWriteHalf` など）を保持する
//! - 1 行の書き込みと flush を行う
//! - close 時に送信側半分を shutdown して解放する
//!
//! ## 設計ノート
//!
//! 書き込み側は `Mutex<Option<W>>` で保持します。
//! ロックにより同じピアへの書き込みが直列化され、行が混ざることはありません。
//! close 後は `None` になり、以降の書き込みは `PeerWriteError::Closed` を返します。

use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};

use crate::domain::{PeerSink, PeerWriteError};

/// `AsyncWrite` を使った PeerSink 実装
pub struct StreamPeerSink<W> {
    writer: Mutex<Option<W>>,
}

impl<W> StreamPeerSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// 新しい StreamPeerSink を作成
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(Some(writer)),
        }
    }
}

#[async_trait]
impl<W> PeerSink for StreamPeerSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn send_line(&self, line: &str) -> Result<(), PeerWriteError> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(PeerWriteError::Closed)?;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn close(&self) {
        let mut guard = self.writer.lock().await;
        if let Some(mut writer) = guard.take()
            && let Err(e) = writer.shutdown().await
        {
            tracing::debug!("Failed to shut down peer writer: {}", e);
        }
    }
}
