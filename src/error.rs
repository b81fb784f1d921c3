//! Error types for the matchmaking server
//!
//! Defines transport-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.
//!
//! The matchmaking core itself has no error type: unknown ids, stale
//! partner references, and stale queue candidates are all silent no-ops.

use thiserror::Error;

/// Transport-level errors
///
/// All of these are fatal for the connection they occur on; none of
/// them surface to other clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (internal channel broken)
    #[error("Channel send error")]
    ChannelSend,
}

/// Message send errors
///
/// Occurs when attempting to send messages through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
