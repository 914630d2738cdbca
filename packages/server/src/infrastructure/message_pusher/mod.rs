//! ピアへの書き込み（PeerSink）の実装
//!
//! - `stream`: 任意の `AsyncWrite`（TCP の書き込み側半分など）を使った実装

pub mod stream;

pub use stream::StreamPeerSink;
