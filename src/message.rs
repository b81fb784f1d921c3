//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization.
//!
//! Type tags are snake_case (`find_stranger`, `search_canceled`), field
//! names are camelCase (`strangerId`, `isTyping`) to match the browser
//! client.

use serde::{Deserialize, Serialize};

/// Client → Server message
///
/// All messages from client to server. Uses tagged enum with snake_case naming.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start looking for a stranger to chat with
    FindStranger,
    /// Stop looking for a stranger
    CancelSearch,
    /// Leave the current stranger and search for a new one
    #[serde(rename_all = "camelCase")]
    NextStranger { current_stranger_id: String },
    /// Leave the current stranger without searching again
    #[serde(rename_all = "camelCase")]
    Disconnect { stranger_id: String },
    /// Send a chat message to the current stranger
    Message { message: String },
    /// Typing indicator toggle
    #[serde(rename_all = "camelCase")]
    Typing { is_typing: bool },
    /// Request the current online/active-chat counts
    GetOnlineCount,
}

/// Server → Client message
///
/// All messages from server to client. Uses tagged enum with snake_case naming.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A stranger was found; chat is now open
    #[serde(rename_all = "camelCase")]
    Matched { stranger_id: String },
    /// The stranger left or disconnected
    Disconnected,
    /// Search canceled at the client's request
    SearchCanceled,
    /// Chat message from the stranger
    Message { message: String },
    /// Typing indicator from the stranger
    #[serde(rename_all = "camelCase")]
    Typing { is_typing: bool },
    /// Number of clients currently connected
    OnlineCount { count: usize },
    /// Number of chats currently in progress
    ActiveChats { count: usize },
}
