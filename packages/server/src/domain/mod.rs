//! Domain layer: value objects, entities, the lobby aggregate and the seams
//! the outer layers implement.

pub mod channel;
pub mod entity;
pub mod error;
pub mod lobby;
pub mod repository;
pub mod value_object;

pub use channel::{ClientChannel, Notification};
pub use entity::{
    ActiveGroup, ClientProfile, GroupCriteria, GroupMember, GroupRequest,
};
pub use error::{LobbyError, MessagePushError, ValueObjectError};
pub use lobby::{
    ClientRemoval, ConnectionSnapshot, DisbandedGroup, Lobby, LobbySnapshot, Registration,
};
pub use repository::LobbyRepository;
pub use value_object::{
    AgeRange, ChatTime, ClientId, ConnectionId, GroupId, GroupRequestId, Timestamp,
};
