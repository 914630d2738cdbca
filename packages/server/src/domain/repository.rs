//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{HistoryError, Message, PeerHandle, PeerId};

/// 接続中のピアのレジストリ
///
/// 多数のコネクションハンドラから同時に呼ばれるため、実装はスレッドセーフであること。
/// `snapshot` はある時点の一貫したビューを返し、呼び出し側はロックを保持せずに
/// そのビューを走査できる（ネットワーク書き込み中にロックを保持しない）。
#[async_trait]
pub trait PeerRegistry: Send + Sync {
    /// ピアを登録
    async fn add(&self, peer: PeerHandle);

    /// ピアを削除（冪等）
    ///
    /// 削除されたハンドルを返す。既に削除済みの場合は `None`。
    async fn remove(&self, id: PeerId) -> Option<PeerHandle>;

    /// 接続順に並んだピアのスナップショットを取得
    async fn snapshot(&self) -> Vec<PeerHandle>;

    /// 接続中のピア数を取得
    async fn count(&self) -> usize;
}

/// 受理したメッセージの追記専用ストア
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// メッセージを 1 レコード追記し、ストレージへの flush を待ってから返る
    async fn append(&self, message: &Message) -> Result<(), HistoryError>;
}
