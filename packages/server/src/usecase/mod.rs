//! UseCase 層
//!
//! 各ユースケースは `LobbyRepository` を通して Lobby 集約を操作します。
//! WebSocket プロトコル（登録・切断・リクエスト作成/キャンセル）と
//! マッチメイキングのトリガー（グループ形成/解散）の両方をここで扱います。

mod cancel_group_request;
mod create_group_request;
mod disband_group;
mod disconnect_client;
mod error;
mod form_group;
mod register_client;
#[cfg(test)]
pub(crate) mod test_support;

pub use cancel_group_request::CancelGroupRequestUseCase;
pub use create_group_request::CreateGroupRequestUseCase;
pub use disband_group::DisbandGroupUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{
    CancelGroupRequestError, CreateGroupRequestError, DisbandGroupError, FormGroupError,
};
pub use form_group::FormGroupUseCase;
pub use register_client::RegisterClientUseCase;
