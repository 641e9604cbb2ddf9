//! Async driver for the session state machine.
//!
//! One tokio task owns the machine, at most one WebSocket, at most one pending
//! handshake and at most one pending reconnect timer. Callers talk to it through
//! a cloneable `SessionHandle`.
//!
//! The handshake is polled as one more branch of the `select!`; commands keep
//! being handled while it is in flight.

use std::{collections::VecDeque, pin::Pin, time::Duration};

use futures_util::{FutureExt, SinkExt, StreamExt, future::BoxFuture};
use thiserror::Error;
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Sleep,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{error::ClientError, identity::Profile};

use super::machine::{GroupPreferences, SessionAction, SessionEvent, SessionMachine, SessionStatus};

/// Upper bound on one TCP + WebSocket handshake
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type Transport = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
enum ConnectError {
    #[error(transparent)]
    Handshake(#[from] tungstenite::Error),

    #[error("handshake timed out after {:?}", CONNECT_TIMEOUT)]
    TimedOut,
}

type PendingConnect = BoxFuture<'static, Result<Transport, ConnectError>>;

#[derive(Debug)]
enum Command {
    Connect(Profile),
    CreateGroup(GroupPreferences),
    CancelGroup(Option<String>),
    Disconnect,
}

/// Cloneable handle on a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<SessionStatus>,
}

impl SessionHandle {
    pub fn connect(&self, profile: Profile) -> Result<(), ClientError> {
        self.send(Command::Connect(profile))
    }

    pub fn create_group(&self, preferences: GroupPreferences) -> Result<(), ClientError> {
        self.send(Command::CreateGroup(preferences))
    }

    /// `None` cancels the last acknowledged request
    pub fn cancel_group(&self, request_id: Option<String>) -> Result<(), ClientError> {
        self.send(Command::CancelGroup(request_id))
    }

    pub fn disconnect(&self) -> Result<(), ClientError> {
        self.send(Command::Disconnect)
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Wait until the session reaches `status`
    pub async fn wait_for_status(&self, status: SessionStatus) -> Result<(), ClientError> {
        let mut receiver = self.status.clone();
        receiver
            .wait_for(|current| *current == status)
            .await
            .map(|_| ())
            .map_err(|_| ClientError::SessionClosed)
    }

    fn send(&self, command: Command) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .map_err(|_| ClientError::SessionClosed)
    }
}

/// Session task state
pub struct ClientSession {
    url: String,
    machine: SessionMachine,
    transport: Option<Transport>,
    connecting: Option<PendingConnect>,
    reconnect: Option<Pin<Box<Sleep>>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    status: watch::Sender<SessionStatus>,
}

impl ClientSession {
    /// Spawn a session task for the coordinator at `url`.
    ///
    /// The task stops once every `SessionHandle` has been dropped.
    pub fn spawn(
        url: impl Into<String>,
    ) -> (
        SessionHandle,
        mpsc::UnboundedReceiver<SessionEvent>,
        JoinHandle<()>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SessionStatus::Disconnected);

        let session = ClientSession {
            url: url.into(),
            machine: SessionMachine::new(),
            transport: None,
            connecting: None,
            reconnect: None,
            events: event_tx,
            status: status_tx,
        };
        let task = tokio::spawn(session.run(command_rx));

        let handle = SessionHandle {
            commands: command_tx,
            status: status_rx,
        };
        (handle, event_rx, task)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            let actions = tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => break,
                },
                message = next_message(&mut self.transport) => self.on_transport(message),
                result = handshake_finished(&mut self.connecting) => {
                    self.connecting = None;
                    self.on_handshake(result)
                }
                _ = reconnect_elapsed(&mut self.reconnect) => {
                    self.reconnect = None;
                    self.machine.reconnect_timer_fired()
                }
            };
            self.apply(actions).await;
        }

        let actions = self.machine.disconnect();
        self.apply(actions).await;
        tracing::debug!("Session task stopped");
    }

    fn on_command(&mut self, command: Command) -> Vec<SessionAction> {
        match command {
            Command::Connect(profile) => self.machine.connect(profile),
            Command::CreateGroup(preferences) => self.machine.create_group(preferences),
            Command::CancelGroup(request_id) => self.machine.cancel_group(request_id),
            Command::Disconnect => self.machine.disconnect(),
        }
    }

    fn on_transport(
        &mut self,
        message: Option<Result<Message, tungstenite::Error>>,
    ) -> Vec<SessionAction> {
        match message {
            Some(Ok(Message::Text(text))) => self.machine.text_received(text.as_str()),
            Some(Ok(Message::Close(_))) | None => {
                tracing::info!("Connection closed by the coordinator");
                self.transport = None;
                self.machine.transport_closed()
            }
            Some(Ok(_)) => Vec::new(),
            Some(Err(e)) => {
                tracing::warn!("WebSocket error: {}", e);
                self.machine.transport_error()
            }
        }
    }

    fn on_handshake(&mut self, result: Result<Transport, ConnectError>) -> Vec<SessionAction> {
        match result {
            Ok(transport) => {
                tracing::info!("Connected to {}", self.url);
                self.transport = Some(transport);
                self.machine.transport_opened()
            }
            Err(e) => {
                tracing::warn!("Failed to connect to {}: {}", self.url, e);
                self.machine.transport_closed()
            }
        }
    }

    /// Start a handshake; a previous one still in flight is dropped
    fn open_transport(&mut self) {
        let url = self.url.clone();
        let handshake = async move {
            match tokio::time::timeout(CONNECT_TIMEOUT, connect_async(url)).await {
                Ok(Ok((transport, _))) => Ok(transport),
                Ok(Err(e)) => Err(e.into()),
                Err(_) => Err(ConnectError::TimedOut),
            }
        };
        self.connecting = Some(handshake.boxed());
    }

    async fn apply(&mut self, actions: Vec<SessionAction>) {
        let mut queue = VecDeque::from(actions);
        while let Some(action) = queue.pop_front() {
            match action {
                SessionAction::OpenTransport => self.open_transport(),
                SessionAction::Send(frame) => {
                    let json = match frame.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize frame: {}", e);
                            continue;
                        }
                    };
                    let Some(transport) = self.transport.as_mut() else {
                        tracing::warn!("No open connection, frame dropped");
                        continue;
                    };
                    if let Err(e) = transport.send(Message::text(json)).await {
                        tracing::warn!("Failed to send frame: {}", e);
                        queue.extend(self.machine.transport_error());
                    }
                }
                SessionAction::CloseTransport => {
                    if self.connecting.take().is_some() {
                        tracing::debug!("Pending connection attempt abandoned");
                    }
                    if let Some(mut transport) = self.transport.take() {
                        let _ = transport.close(None).await;
                    }
                }
                SessionAction::ScheduleReconnect(delay) => {
                    self.reconnect = Some(Box::pin(tokio::time::sleep(delay)));
                }
                SessionAction::CancelReconnect => self.reconnect = None,
                SessionAction::Emit(event) => {
                    if let SessionEvent::StatusChanged(status) = &event {
                        self.status.send_replace(*status);
                    }
                    // 受信側が破棄されていても続行する
                    let _ = self.events.send(event);
                }
            }
        }
    }
}

async fn next_message(
    transport: &mut Option<Transport>,
) -> Option<Result<Message, tungstenite::Error>> {
    match transport {
        Some(transport) => transport.next().await,
        None => std::future::pending().await,
    }
}

async fn handshake_finished(connecting: &mut Option<PendingConnect>) -> Result<Transport, ConnectError> {
    match connecting {
        Some(handshake) => handshake.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn reconnect_elapsed(reconnect: &mut Option<Pin<Box<Sleep>>>) {
    match reconnect {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
