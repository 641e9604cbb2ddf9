//! Lobby aggregate: the coordinator's four tables and their operations.
//!
//! The lobby owns the connection registry, the group request ledger with its
//! reverse index, and the active group table. Every operation is synchronous and
//! runs to completion; notifications are enqueued on client channels before the
//! operation returns, so a caller holding the lobby behind one lock observes each
//! operation as a single step.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use huddle_shared::time::{Clock, timestamp_to_rfc3339};

use super::{
    channel::{ClientChannel, Notification},
    entity::{ActiveGroup, ClientProfile, GroupCriteria, GroupMember, GroupRequest},
    error::LobbyError,
    value_object::{ChatTime, ClientId, ConnectionId, GroupId, GroupRequestId, Timestamp},
};

/// Live registry entry
pub struct ClientConnection {
    pub connection_id: ConnectionId,
    pub profile: ClientProfile,
    channel: Arc<dyn ClientChannel>,
}

/// Outcome of a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Transport displaced by this registration, already closed
    pub replaced: Option<ConnectionId>,
}

/// Outcome of removing a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRemoval {
    /// Request implicitly cancelled because its creator left
    pub cancelled_request: Option<GroupRequestId>,
}

/// Outcome of disbanding a group
#[derive(Debug, Clone, PartialEq)]
pub struct DisbandedGroup {
    pub group: ActiveGroup,
    /// Members that received `group_disbanded`
    pub notified: Vec<ClientId>,
}

/// Registry entry without its transport handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub connection_id: ConnectionId,
    pub profile: ClientProfile,
}

/// Point-in-time copy of all four tables
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LobbySnapshot {
    pub connections: BTreeMap<ClientId, ConnectionSnapshot>,
    pub requests: BTreeMap<GroupRequestId, GroupRequest>,
    pub client_requests: BTreeMap<ClientId, GroupRequestId>,
    pub active_groups: BTreeMap<GroupId, ActiveGroup>,
}

pub struct Lobby {
    connections: HashMap<ClientId, ClientConnection>,
    requests: HashMap<GroupRequestId, GroupRequest>,
    /// Reverse index: at most one live request per client
    client_requests: HashMap<ClientId, GroupRequestId>,
    active_groups: HashMap<GroupId, ActiveGroup>,
    clock: Arc<dyn Clock>,
}

impl Lobby {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            connections: HashMap::new(),
            requests: HashMap::new(),
            client_requests: HashMap::new(),
            active_groups: HashMap::new(),
            clock,
        }
    }

    /// Install `client_id` on a transport, last writer wins.
    ///
    /// A previous transport registered under the same identifier is closed and
    /// its entry discarded. The client's pending request, if any, is kept.
    pub fn register_client(
        &mut self,
        client_id: ClientId,
        connection_id: ConnectionId,
        profile: ClientProfile,
        channel: Arc<dyn ClientChannel>,
    ) -> Registration {
        let replaced = self.connections.remove(&client_id).map(|previous| {
            if previous.connection_id != connection_id {
                tracing::info!(
                    "Client '{}' re-registered, closing previous connection {}",
                    client_id,
                    previous.connection_id
                );
                previous.channel.close();
            }
            previous.connection_id
        });

        let ack = Notification::Registered {
            client_id: client_id.clone(),
        };
        if let Err(e) = channel.push(&ack) {
            tracing::warn!("Failed to acknowledge registration of '{}': {}", client_id, e);
        }

        tracing::info!(
            "Client registered: '{}' ({})",
            client_id,
            profile.display_name()
        );
        self.connections.insert(
            client_id,
            ClientConnection {
                connection_id,
                profile,
                channel,
            },
        );
        self.log_pool_status();

        Registration { replaced }
    }

    /// Remove the entry for `client_id` if it still belongs to `connection_id`.
    ///
    /// Cascades to the client's pending request. Nobody is notified.
    pub fn remove_client(
        &mut self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> Option<ClientRemoval> {
        match self.connections.get(client_id) {
            Some(connection) if connection.connection_id == connection_id => {}
            _ => return None,
        }

        self.connections.remove(client_id);
        let cancelled_request = self
            .client_requests
            .remove(client_id)
            .inspect(|request_id| {
                self.requests.remove(request_id);
            });

        tracing::info!("Client disconnected: '{}'", client_id);
        self.log_pool_status();

        Some(ClientRemoval { cancelled_request })
    }

    /// Create a request for a registered client, superseding its previous one.
    pub fn create_request(
        &mut self,
        client_id: &ClientId,
        criteria: GroupCriteria,
    ) -> Result<GroupRequest, LobbyError> {
        let connection = self
            .connections
            .get(client_id)
            .ok_or_else(|| LobbyError::ClientNotFound(client_id.to_string()))?;

        let replaced = self
            .client_requests
            .remove(client_id)
            .inspect(|previous| {
                self.requests.remove(previous);
            });
        if let Some(previous) = &replaced {
            tracing::info!(
                "Previous group request {} of '{}' removed",
                previous,
                client_id
            );
        }

        let request = GroupRequest {
            id: GroupRequestId::generate(),
            creator_id: client_id.clone(),
            creator_name: connection.profile.display_name(),
            criteria,
            created_at: Timestamp::new(self.clock.now_millis()),
        };
        self.requests.insert(request.id.clone(), request.clone());
        self.client_requests
            .insert(client_id.clone(), request.id.clone());

        let ack = Notification::GroupCreated {
            request: request.clone(),
        };
        if let Err(e) = connection.channel.push(&ack) {
            tracing::warn!("Failed to acknowledge group request to '{}': {}", client_id, e);
        }

        tracing::info!(
            "Group request created: {} by '{}' (size {}, {} min)",
            request.id,
            client_id,
            request.criteria.group_size,
            request.criteria.chat_time
        );
        self.log_pool_status();

        Ok(request)
    }

    /// Cancel a request on behalf of its creator.
    pub fn cancel_request(
        &mut self,
        request_id: &GroupRequestId,
        client_id: &ClientId,
    ) -> Result<(), LobbyError> {
        let request = self
            .requests
            .get(request_id)
            .ok_or_else(|| LobbyError::GroupRequestNotFound(request_id.to_string()))?;
        if &request.creator_id != client_id {
            return Err(LobbyError::NotRequestOwner {
                request_id: request_id.to_string(),
                client_id: client_id.to_string(),
            });
        }

        self.requests.remove(request_id);
        self.client_requests.remove(client_id);

        if let Some(connection) = self.connections.get(client_id) {
            let ack = Notification::GroupCancelled {
                request_id: request_id.clone(),
            };
            if let Err(e) = connection.channel.push(&ack) {
                tracing::warn!("Failed to acknowledge cancellation to '{}': {}", client_id, e);
            }
        }

        tracing::info!("Group request cancelled: {} by '{}'", request_id, client_id);
        self.log_pool_status();

        Ok(())
    }

    /// Consume `request_ids` and bind `client_ids` into a new active group.
    ///
    /// Every identifier is checked before anything is mutated; the first
    /// missing one fails the whole call.
    pub fn form_group(
        &mut self,
        request_ids: &[GroupRequestId],
        client_ids: &[ClientId],
        chat_time: ChatTime,
    ) -> Result<ActiveGroup, LobbyError> {
        if let Some(missing) = request_ids
            .iter()
            .find(|id| !self.requests.contains_key(*id))
        {
            return Err(LobbyError::GroupRequestNotFound(missing.to_string()));
        }
        if let Some(missing) = client_ids
            .iter()
            .find(|id| !self.connections.contains_key(*id))
        {
            return Err(LobbyError::ClientNotFound(missing.to_string()));
        }

        for request_id in request_ids {
            if let Some(request) = self.requests.remove(request_id)
                && self.client_requests.get(&request.creator_id) == Some(request_id)
            {
                self.client_requests.remove(&request.creator_id);
            }
        }

        let members: Vec<(&ClientId, &ClientConnection)> = client_ids
            .iter()
            .filter_map(|id| self.connections.get(id).map(|connection| (id, connection)))
            .collect();

        let group = ActiveGroup {
            id: GroupId::generate(),
            members: members
                .iter()
                .map(|(id, connection)| GroupMember {
                    client_id: (*id).clone(),
                    first_name: connection.profile.first_name.clone(),
                    last_name: connection.profile.last_name.clone(),
                })
                .collect(),
            chat_time,
            created_at: Timestamp::new(self.clock.now_millis()),
        };

        let formed = Notification::GroupFormed {
            group_id: group.id.clone(),
            chat_time,
            members: members
                .iter()
                .map(|(_, connection)| connection.profile.clone())
                .collect(),
        };
        for (id, connection) in &members {
            if let Err(e) = connection.channel.push(&formed) {
                tracing::warn!("Failed to send group_formed to '{}': {}", id, e);
            }
        }

        self.active_groups.insert(group.id.clone(), group.clone());

        tracing::info!(
            "Group formed: {} with {} members ({} min), consumed {} requests",
            group.id,
            group.members.len(),
            chat_time,
            request_ids.len()
        );
        self.log_pool_status();

        Ok(group)
    }

    /// Notify open members and delete the group.
    pub fn disband_group(&mut self, group_id: &GroupId) -> Result<DisbandedGroup, LobbyError> {
        let group = self
            .active_groups
            .remove(group_id)
            .ok_or_else(|| LobbyError::GroupNotFound(group_id.to_string()))?;

        let disbanded = Notification::GroupDisbanded {
            group_id: group_id.clone(),
        };
        let mut notified = Vec::with_capacity(group.members.len());
        for member_id in group.member_ids() {
            match self.connections.get(member_id) {
                Some(connection) if connection.channel.is_open() => {
                    match connection.channel.push(&disbanded) {
                        Ok(()) => notified.push(member_id.clone()),
                        Err(e) => tracing::warn!(
                            "Failed to send group_disbanded to '{}': {}",
                            member_id,
                            e
                        ),
                    }
                }
                _ => tracing::debug!("Skipping closed member '{}' of group {}", member_id, group_id),
            }
        }

        tracing::info!(
            "Group disbanded: {} ({})",
            group_id,
            group
                .members
                .iter()
                .map(GroupMember::display_name)
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.log_pool_status();

        Ok(DisbandedGroup { group, notified })
    }

    pub fn is_registered(&self, client_id: &ClientId) -> bool {
        self.connections.contains_key(client_id)
    }

    pub fn request_of(&self, client_id: &ClientId) -> Option<&GroupRequest> {
        self.client_requests
            .get(client_id)
            .and_then(|request_id| self.requests.get(request_id))
    }

    pub fn snapshot(&self) -> LobbySnapshot {
        LobbySnapshot {
            connections: self
                .connections
                .iter()
                .map(|(id, connection)| {
                    (
                        id.clone(),
                        ConnectionSnapshot {
                            connection_id: connection.connection_id,
                            profile: connection.profile.clone(),
                        },
                    )
                })
                .collect(),
            requests: self
                .requests
                .iter()
                .map(|(id, request)| (id.clone(), request.clone()))
                .collect(),
            client_requests: self
                .client_requests
                .iter()
                .map(|(client, request)| (client.clone(), request.clone()))
                .collect(),
            active_groups: self
                .active_groups
                .iter()
                .map(|(id, group)| (id.clone(), group.clone()))
                .collect(),
        }
    }

    fn log_pool_status(&self) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }

        tracing::debug!(
            connections = self.connections.len(),
            group_requests = self.requests.len(),
            active_groups = self.active_groups.len(),
            "Lobby pool status"
        );
        for (client_id, connection) in &self.connections {
            tracing::debug!(
                client_id = %client_id,
                name = %connection.profile.display_name(),
                has_group_request = self.client_requests.contains_key(client_id),
                "connection"
            );
        }
        for request in self.requests.values() {
            let criteria = &request.criteria;
            let chat_time = format!("{}min", criteria.chat_time);
            let age = format!("{}-{}", criteria.age_range.min(), criteria.age_range.max());
            let distance = format!("{}km", criteria.distance);
            let created_at = timestamp_to_rfc3339(request.created_at.value());
            tracing::debug!(
                request_id = %request.id,
                creator = %request.creator_name,
                size = criteria.group_size,
                chat_time = %chat_time,
                age = %age,
                distance = %distance,
                created_at = %created_at,
                "group request"
            );
        }
        for group in self.active_groups.values() {
            let members = group
                .members
                .iter()
                .map(GroupMember::display_name)
                .collect::<Vec<_>>()
                .join(", ");
            let created_at = timestamp_to_rfc3339(group.created_at.value());
            let ends_at = timestamp_to_rfc3339(group.nominal_end().value());
            tracing::debug!(
                group_id = %group.id,
                members = %members,
                member_count = group.members.len(),
                created_at = %created_at,
                ends_at = %ends_at,
                "active group"
            );
        }
    }
}
