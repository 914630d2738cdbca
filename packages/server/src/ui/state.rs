//! Shared server state handed to every connection handler.

use std::sync::Arc;

use linecast_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{HistoryStore, PeerRegistry},
    usecase::{
        BroadcastUseCase, ConnectPeerUseCase, DisconnectPeerUseCase, RelayMessageUseCase,
        SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub connect_peer_usecase: Arc<ConnectPeerUseCase>,
    pub disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// Longest accepted wire line in bytes
    pub max_line_length: usize,
}

impl AppState {
    /// Wire the use cases on top of the given registry, history store and clock.
    pub fn new(
        config: &ServerConfig,
        registry: Arc<dyn PeerRegistry>,
        history: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let broadcast = Arc::new(BroadcastUseCase::new(
            registry.clone(),
            config.write_timeout,
        ));
        let relay = Arc::new(
            RelayMessageUseCase::new(broadcast, history).with_strict_order(config.strict_order),
        );

        Self {
            connect_peer_usecase: Arc::new(ConnectPeerUseCase::new(
                registry.clone(),
                relay.clone(),
                clock.clone(),
            )),
            disconnect_peer_usecase: Arc::new(DisconnectPeerUseCase::new(
                registry,
                relay.clone(),
                clock.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(relay, clock)),
            max_line_length: config.max_line_length,
        }
    }
}
