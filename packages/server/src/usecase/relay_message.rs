//! UseCase: メッセージ中継（ブロードキャスト + 履歴への追記）
//!
//! ブロードキャストと追記は独立した best-effort の操作です。
//! 追記に失敗してもブロードキャストは行われ、その逆も同様です（アトミックではない）。
//!
//! 1 つのメッセージについては、ブロードキャスト → 追記 の順に呼び出し元のタスク内で
//! 直列に実行されます。`strict_order` を有効にすると全ハンドラの中継を 1 つのロックで
//! 直列化し、履歴の順序と全ピアへの配信順序が一致するようになります。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{HistoryStore, Message, PeerId};

use super::broadcast::{BroadcastReport, BroadcastUseCase};

/// 中継の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    /// ブロードキャストの結果（エンコード失敗時は `None`）
    pub broadcast: Option<BroadcastReport>,
    /// 履歴への追記に成功したか
    pub logged: bool,
}

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// BroadcastUseCase（配信）
    broadcast: Arc<BroadcastUseCase>,
    /// HistoryStore（履歴ログの抽象化）
    history: Arc<dyn HistoryStore>,
    /// 全体の順序付けを行う場合のロック
    sequencer: Option<Mutex<()>>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(broadcast: Arc<BroadcastUseCase>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            broadcast,
            history,
            sequencer: None,
        }
    }

    /// 全ハンドラの中継を 1 つのロックで直列化するかを設定
    pub fn with_strict_order(mut self, strict_order: bool) -> Self {
        self.sequencer = strict_order.then(|| Mutex::new(()));
        self
    }

    /// 中継を実行
    ///
    /// # Arguments
    ///
    /// * `message` - 中継するメッセージ（サーバーでタイムスタンプ付与済み）
    /// * `exclude` - 配信対象から除外するピア
    pub async fn execute(&self, message: Message, exclude: Option<PeerId>) -> RelayOutcome {
        let _guard = match &self.sequencer {
            Some(sequencer) => Some(sequencer.lock().await),
            None => None,
        };

        let broadcast = match self.broadcast.execute(&message, exclude).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Failed to broadcast message from '{}': {}", message.sender, e);
                None
            }
        };

        let logged = match self.history.append(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to append message to history: {}", e);
                false
            }
        };

        RelayOutcome { broadcast, logged }
    }
}
