//! Repository 実装
//!
//! - `inmemory`: 接続中ピアのレジストリ
//! - `jsonl`: JSON Lines 形式の履歴ログ

pub mod inmemory;
pub mod jsonl;

pub use inmemory::InMemoryPeerRegistry;
pub use jsonl::JsonLinesHistoryLog;
