//! PeerSink trait 定義
//!
//! ピアへの書き込み（送信側半分）の抽象化です。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::PeerWriteError;

/// ピアの送信側半分
///
/// 1 つの sink に対する書き込みは直列化されることを実装側が保証する。
/// これにより、順番にブロードキャストされた 2 つのメッセージは
/// 全てのピアで同じ順序で観測される。
#[async_trait]
pub trait PeerSink: Send + Sync {
    /// エンコード済みの 1 行を書き込み、flush する
    async fn send_line(&self, line: &str) -> Result<(), PeerWriteError>;

    /// 送信側半分を解放する（冪等）
    async fn close(&self);
}
