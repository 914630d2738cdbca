//! JSON Lines 形式の履歴ログ
//!
//! ## 責務
//!
//! - 受理したメッセージを 1 行 1 レコードで追記する
//! - 初回書き込み時に親ディレクトリとファイルを作成する
//! - 書き込みをストレージに flush (`sync_data`) してから返る
//!
//! 追記はプロセス内で直列化されるため、同時に呼ばれてもレコードが混ざることはない。
//! ファイルは追記のみで、既存のレコードを書き換えたり削除したりしない。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::{
    domain::{HistoryError, HistoryStore, Message},
    infrastructure::codec,
};

/// JSON Lines ファイルに追記する HistoryStore 実装
pub struct JsonLinesHistoryLog {
    path: PathBuf,
    /// 追記を直列化するためのロック
    write_lock: Mutex<()>,
}

impl JsonLinesHistoryLog {
    /// 新しい JsonLinesHistoryLog を作成
    ///
    /// ファイルはこの時点では作成せず、最初の追記時に作成する。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| HistoryError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for JsonLinesHistoryLog {
    async fn append(&self, message: &Message) -> Result<(), HistoryError> {
        let line = codec::encode(message)?;

        let _guard = self.write_lock.lock().await;
        self.ensure_parent_dir().await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| HistoryError::Open {
                path: self.path.clone(),
                source,
            })?;

        let write_err = |source: std::io::Error| HistoryError::Write {
            path: self.path.clone(),
            source,
        };
        file.write_all(line.as_bytes()).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        file.sync_data().await.map_err(write_err)?;

        tracing::debug!("Appended {} bytes to {}", line.len(), self.path.display());
        Ok(())
    }
}
