//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::CodecError;

/// ブロードキャストのエラー
///
/// 個々のピアへの書き込み失敗はエラーにならない（そのピアを切断して続行する）。
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// メッセージのエンコードに失敗
    #[error(transparent)]
    Encode(#[from] CodecError),
}
