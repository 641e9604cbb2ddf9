//! Session state machine.
//!
//! `disconnected` → `connecting` → `connected`. The machine never performs I/O:
//! every input returns the actions the driver must carry out, in order.

use std::time::Duration;

use huddle_server::infrastructure::dto::websocket::{
    AgeRangeDto, CancelGroupFrame, ClientFrame, CreateGroupFrame, GroupRequestDto, MemberDto,
    ServerFrame,
};

use crate::identity::Profile;

/// Automatic reconnection attempts after the transport closes
pub const MAX_RECONNECT_ATTEMPTS: u32 = 3;
/// Delay before each reconnection attempt
pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Something the caller of the session should know about
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StatusChanged(SessionStatus),
    Registered {
        client_id: String,
    },
    GroupCreated {
        request_id: String,
        request: GroupRequestDto,
    },
    GroupCancelled {
        request_id: String,
    },
    GroupFormed {
        group_id: String,
        /// Minutes, possibly fractional
        chat_time: f64,
        members: Vec<MemberDto>,
    },
    GroupDisbanded {
        group_id: String,
    },
}

/// Side effect requested by the machine
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    OpenTransport,
    Send(ClientFrame),
    CloseTransport,
    ScheduleReconnect(Duration),
    CancelReconnect,
    Emit(SessionEvent),
}

/// Criteria of a group request issued from the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPreferences {
    pub age_min: u32,
    pub age_max: u32,
    pub distance: u32,
    pub group_size: u32,
    pub chat_time: u32,
}

#[derive(Debug)]
pub struct SessionMachine {
    status: SessionStatus,
    retry_count: u32,
    /// Stored on `connect`, reused by every reconnection
    profile: Option<Profile>,
    transport_open: bool,
    last_request_id: Option<String>,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Disconnected,
            retry_count: 0,
            profile: None,
            transport_open: false,
            last_request_id: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Id of the last acknowledged group request still pending
    pub fn last_request_id(&self) -> Option<&str> {
        self.last_request_id.as_deref()
    }

    pub fn client_id(&self) -> Option<String> {
        self.profile.as_ref().map(Profile::client_id)
    }

    /// Start a session. Ignored unless disconnected.
    pub fn connect(&mut self, profile: Profile) -> Vec<SessionAction> {
        if self.status != SessionStatus::Disconnected {
            tracing::warn!("connect() ignored while {:?}", self.status);
            return Vec::new();
        }

        self.profile = Some(profile);
        self.retry_count = 0;
        let mut actions = self.set_status(SessionStatus::Connecting);
        actions.push(SessionAction::OpenTransport);
        actions
    }

    pub fn transport_opened(&mut self) -> Vec<SessionAction> {
        if self.status == SessionStatus::Disconnected {
            return vec![SessionAction::CloseTransport];
        }

        self.transport_open = true;
        match &self.profile {
            Some(profile) => vec![SessionAction::Send(ClientFrame::Register(
                profile.register_frame(),
            ))],
            None => Vec::new(),
        }
    }

    pub fn transport_closed(&mut self) -> Vec<SessionAction> {
        self.transport_open = false;
        if self.status == SessionStatus::Disconnected {
            return Vec::new();
        }

        if self.retry_count < MAX_RECONNECT_ATTEMPTS {
            self.retry_count += 1;
            tracing::info!(
                "Connection closed, reconnecting in {:?} (attempt {}/{})",
                RECONNECT_DELAY,
                self.retry_count,
                MAX_RECONNECT_ATTEMPTS
            );
            let mut actions = self.set_status(SessionStatus::Connecting);
            actions.push(SessionAction::ScheduleReconnect(RECONNECT_DELAY));
            actions
        } else {
            tracing::warn!(
                "Giving up after {} reconnection attempts",
                MAX_RECONNECT_ATTEMPTS
            );
            self.set_status(SessionStatus::Disconnected)
        }
    }

    /// Force-close, then handle like a close
    pub fn transport_error(&mut self) -> Vec<SessionAction> {
        let mut actions = vec![SessionAction::CloseTransport];
        actions.extend(self.transport_closed());
        actions
    }

    pub fn reconnect_timer_fired(&mut self) -> Vec<SessionAction> {
        if self.status == SessionStatus::Connecting && !self.transport_open {
            vec![SessionAction::OpenTransport]
        } else {
            Vec::new()
        }
    }

    pub fn text_received(&mut self, text: &str) -> Vec<SessionAction> {
        let frame = match ServerFrame::parse(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Ignoring unparsable frame: {}", e);
                return Vec::new();
            }
        };

        match frame {
            ServerFrame::Registered(registered) => {
                self.retry_count = 0;
                let mut actions = self.set_status(SessionStatus::Connected);
                actions.push(SessionAction::Emit(SessionEvent::Registered {
                    client_id: registered.client_id,
                }));
                actions
            }
            ServerFrame::GroupCreated(created) => {
                self.last_request_id = Some(created.group_id.clone());
                vec![SessionAction::Emit(SessionEvent::GroupCreated {
                    request_id: created.group_id,
                    request: created.request,
                })]
            }
            ServerFrame::GroupCancelled(cancelled) => {
                if self.last_request_id.as_deref() == Some(cancelled.group_id.as_str()) {
                    self.last_request_id = None;
                }
                vec![SessionAction::Emit(SessionEvent::GroupCancelled {
                    request_id: cancelled.group_id,
                })]
            }
            ServerFrame::GroupFormed(formed) => {
                // 形成でリクエストは消費される
                self.last_request_id = None;
                vec![SessionAction::Emit(SessionEvent::GroupFormed {
                    group_id: formed.group_id,
                    chat_time: formed.chat_time,
                    members: formed.members,
                })]
            }
            ServerFrame::GroupDisbanded(disbanded) => {
                vec![SessionAction::Emit(SessionEvent::GroupDisbanded {
                    group_id: disbanded.group_id,
                })]
            }
            ServerFrame::Unknown => {
                tracing::debug!("Ignoring frame of unknown type");
                Vec::new()
            }
        }
    }

    pub fn create_group(&mut self, preferences: GroupPreferences) -> Vec<SessionAction> {
        let Some(client_id) = self.ready_client_id("create_group") else {
            return Vec::new();
        };

        vec![SessionAction::Send(ClientFrame::CreateGroup(
            CreateGroupFrame {
                client_id,
                age_range: AgeRangeDto {
                    min: preferences.age_min,
                    max: preferences.age_max,
                },
                distance: preferences.distance,
                group_size: preferences.group_size,
                chat_time: preferences.chat_time,
            },
        ))]
    }

    /// Cancel `request_id`, or the last acknowledged request when `None`
    pub fn cancel_group(&mut self, request_id: Option<String>) -> Vec<SessionAction> {
        let Some(client_id) = self.ready_client_id("cancel_group") else {
            return Vec::new();
        };
        let Some(group_id) = request_id.or_else(|| self.last_request_id.clone()) else {
            tracing::warn!("cancel_group dropped: no pending group request");
            return Vec::new();
        };

        vec![SessionAction::Send(ClientFrame::CancelGroup(
            CancelGroupFrame {
                group_id,
                client_id,
            },
        ))]
    }

    /// Explicit shutdown: no retry afterwards
    pub fn disconnect(&mut self) -> Vec<SessionAction> {
        self.transport_open = false;
        let mut actions = vec![SessionAction::CancelReconnect, SessionAction::CloseTransport];
        actions.extend(self.set_status(SessionStatus::Disconnected));
        actions
    }

    fn ready_client_id(&self, intent: &str) -> Option<String> {
        if self.status != SessionStatus::Connected || !self.transport_open {
            tracing::warn!("{} dropped: session is {:?}", intent, self.status);
            return None;
        }
        self.client_id()
    }

    fn set_status(&mut self, status: SessionStatus) -> Vec<SessionAction> {
        if self.status == status {
            return Vec::new();
        }
        tracing::debug!("Session status {:?} -> {:?}", self.status, status);
        self.status = status;
        vec![SessionAction::Emit(SessionEvent::StatusChanged(status))]
    }
}
