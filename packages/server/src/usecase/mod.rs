//! UseCase 層
//!
//! - `broadcast`: 1 つのメッセージを登録済みの全ピアに配信する
//! - `relay_message`: ブロードキャストと履歴への追記をまとめて行う
//! - `connect_peer` / `disconnect_peer`: ピアの登録・削除と参加/退出通知
//! - `send_message`: クライアントから受け取ったメッセージの正規化と中継

pub mod broadcast;
pub mod connect_peer;
pub mod disconnect_peer;
pub mod error;
pub mod relay_message;
pub mod send_message;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::{BroadcastReport, BroadcastUseCase};
pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
pub use error::BroadcastError;
pub use relay_message::{RelayMessageUseCase, RelayOutcome};
pub use send_message::SendMessageUseCase;
