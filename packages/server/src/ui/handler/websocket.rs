//! WebSocket connection handlers.
//!
//! Each accepted socket gets its own `ConnectionId` and writer queue. The socket
//! is anonymous until a `register` frame arrives; closing it removes the client
//! only if the registration still belongs to this socket.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientChannel, ClientId, ClientProfile, ConnectionId, GroupCriteria, GroupRequestId},
    infrastructure::{
        channel::{OutboundMessage, WebSocketChannel},
        dto::websocket::{
            CancelGroupFrame, ClientFrame, CreateGroupFrame, ProtocolError, RegisterFrame,
        },
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's queue into the WebSocket sink.
///
/// The task ends after writing a close frame, when the queue is dropped, or when
/// the socket refuses a write.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundMessage>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            match message {
                OutboundMessage::Text(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                OutboundMessage::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    })
}

/// Per-socket protocol state
struct Connection {
    id: ConnectionId,
    state: Arc<AppState>,
    channel: Arc<dyn ClientChannel>,
    /// Identifier most recently registered on this socket
    registered_as: Option<ClientId>,
}

impl Connection {
    async fn receive_loop(&mut self, receiver: &mut SplitStream<WebSocket>) {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on {}: {}", self.id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if let Err(e) = self.dispatch(text.as_str()).await {
                        tracing::warn!("Dropped frame on {}: {}", self.id, e);
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", self.id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    }

    async fn dispatch(&mut self, text: &str) -> Result<(), ProtocolError> {
        match ClientFrame::parse(text)? {
            ClientFrame::Register(frame) => self.on_register(frame).await,
            ClientFrame::CreateGroup(frame) => self.on_create_group(frame).await,
            ClientFrame::CancelGroup(frame) => self.on_cancel_group(frame).await,
            ClientFrame::Unknown => {
                tracing::debug!("Ignoring unknown frame type on {}", self.id);
                Ok(())
            }
        }
    }

    async fn on_register(&mut self, frame: RegisterFrame) -> Result<(), ProtocolError> {
        let client_id = ClientId::try_from(frame.client_id.clone())?;
        let profile = ClientProfile::from(&frame);

        // 同じソケットで別の ID に登録し直した場合は旧 ID の登録を外す
        if let Some(previous) = self.registered_as.take()
            && previous != client_id
        {
            self.state
                .disconnect_client_usecase
                .execute(&previous, self.id)
                .await;
        }

        self.state
            .register_client_usecase
            .execute(client_id.clone(), self.id, profile, self.channel.clone())
            .await;
        self.registered_as = Some(client_id);

        Ok(())
    }

    async fn on_create_group(&mut self, frame: CreateGroupFrame) -> Result<(), ProtocolError> {
        let client_id = ClientId::try_from(frame.client_id.clone())?;
        let criteria = GroupCriteria::try_from(&frame)?;

        if let Err(e) = self
            .state
            .create_group_request_usecase
            .execute(&client_id, criteria)
            .await
        {
            tracing::warn!("create_group from {} ignored: {}", self.id, e);
        }

        Ok(())
    }

    async fn on_cancel_group(&mut self, frame: CancelGroupFrame) -> Result<(), ProtocolError> {
        let request_id = GroupRequestId::try_from(frame.group_id)?;
        let client_id = ClientId::try_from(frame.client_id)?;

        if let Err(e) = self
            .state
            .cancel_group_request_usecase
            .execute(&request_id, &client_id)
            .await
        {
            tracing::warn!("cancel_group from {} ignored: {}", self.id, e);
        }

        Ok(())
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a queue for this connection's outbound frames
    let (tx, rx) = mpsc::unbounded_channel();
    let mut connection = Connection {
        id: ConnectionId::generate(),
        state,
        channel: Arc::new(WebSocketChannel::new(tx)),
        registered_as: None,
    };
    tracing::info!("WebSocket connection opened: {}", connection.id);

    let mut send_task = pusher_loop(rx, sender);

    // If either side finishes, stop the other
    tokio::select! {
        _ = connection.receive_loop(&mut receiver) => send_task.abort(),
        _ = &mut send_task => {},
    };
    connection.channel.close();

    match connection.registered_as.take() {
        Some(client_id) => {
            connection
                .state
                .disconnect_client_usecase
                .execute(&client_id, connection.id)
                .await;
        }
        None => tracing::info!("Connection {} closed before registering", connection.id),
    }
}
