//! InMemory Repository 実装

mod lobby;

pub use lobby::InMemoryLobbyRepository;
