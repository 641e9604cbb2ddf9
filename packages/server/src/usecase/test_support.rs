//! UseCase テスト用の共通ヘルパー

use std::sync::Arc;

use huddle_shared::time::FixedClock;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        AgeRange, ClientId, ClientProfile, ConnectionId, GroupCriteria, Lobby,
        LobbyRepository,
    },
    infrastructure::{
        channel::{OutboundMessage, WebSocketChannel},
        dto::websocket::ServerFrame,
        repository::InMemoryLobbyRepository,
    },
};

pub fn create_test_repository() -> Arc<InMemoryLobbyRepository> {
    let lobby = Arc::new(Mutex::new(Lobby::new(Arc::new(FixedClock::new(
        1_700_000_000_000,
    )))));
    Arc::new(InMemoryLobbyRepository::new(lobby))
}

pub fn client_id(value: &str) -> ClientId {
    ClientId::new(value.to_string()).unwrap()
}

pub fn profile(first_name: &str) -> ClientProfile {
    ClientProfile::new(
        first_name.to_string(),
        "Tester".to_string(),
        format!("{}-photo", first_name),
        None,
    )
}

pub fn criteria(chat_minutes: u32) -> GroupCriteria {
    GroupCriteria {
        age_range: AgeRange::new(20, 30).unwrap(),
        distance: 5,
        group_size: 3,
        chat_time: chat_minutes,
    }
}

/// Register `id` on a fresh WebSocket channel and return its writer queue
pub async fn register(
    repository: &dyn LobbyRepository,
    id: &str,
) -> (ConnectionId, mpsc::UnboundedReceiver<OutboundMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = ConnectionId::generate();
    repository
        .register_client(
            client_id(id),
            connection_id,
            profile(id),
            Arc::new(WebSocketChannel::new(tx)),
        )
        .await;
    (connection_id, rx)
}

/// Drain every frame currently queued for a connection
pub fn drain_frames(rx: &mut mpsc::UnboundedReceiver<OutboundMessage>) -> Vec<ServerFrame> {
    let mut frames = Vec::new();
    while let Ok(message) = rx.try_recv() {
        if let OutboundMessage::Text(json) = message {
            frames.push(ServerFrame::parse(&json).unwrap());
        }
    }
    frames
}
