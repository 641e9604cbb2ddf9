//! WebSocket を使った ClientChannel 実装
//!
//! ## 責務
//!
//! - ドメインの `Notification` を `ServerFrame` の JSON に変換
//! - 接続ごとの送信キュー（`UnboundedSender`）への投入
//!
//! ## 設計ノート
//!
//! WebSocket の生成と実際の書き込みは UI 層（`ui::handler::websocket`）で
//! 行われます。この実装はキューへの投入だけを行うため、Lobby のロックを
//! 保持したまま呼び出してもブロックしません。

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use crate::{
    domain::{ClientChannel, MessagePushError, Notification},
    infrastructure::dto::websocket::ServerFrame,
};

/// Item consumed by a connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// JSON text frame
    Text(String),
    /// Send a close frame and stop writing
    Close,
}

/// WebSocket を使った ClientChannel 実装
pub struct WebSocketChannel {
    sender: mpsc::UnboundedSender<OutboundMessage>,
    closed: AtomicBool,
}

impl WebSocketChannel {
    /// 新しい WebSocketChannel を作成
    ///
    /// # 引数
    ///
    /// - `sender`: 接続の書き込みタスクへの送信キュー
    pub fn new(sender: mpsc::UnboundedSender<OutboundMessage>) -> Self {
        Self {
            sender,
            closed: AtomicBool::new(false),
        }
    }
}

impl ClientChannel for WebSocketChannel {
    fn push(&self, notification: &Notification) -> Result<(), MessagePushError> {
        if !self.is_open() {
            return Err(MessagePushError::TransportClosed);
        }

        let json = ServerFrame::from(notification)
            .to_json()
            .map_err(|e| MessagePushError::Encode(e.to_string()))?;
        self.sender
            .send(OutboundMessage::Text(json))
            .map_err(|_| MessagePushError::TransportClosed)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            // 書き込みタスクが既に終了している場合は何もしない
            let _ = self.sender.send(OutboundMessage::Close);
        }
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && !self.sender.is_closed()
    }
}
