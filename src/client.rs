//! Client struct definition
//!
//! Represents a connected client with their pairing state and
//! communication channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Pairing state of a connected client
///
/// Every client is in exactly one of these states. A `Paired` client
/// is never simultaneously in the search queue, and pairing is always
/// symmetric: if A is `Paired(B)` then B is `Paired(A)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Connected, not looking for a partner
    Idle,
    /// Waiting in the search queue for a partner
    Searching,
    /// Chatting with the given partner
    Paired(ClientId),
}

/// Connected client information
///
/// Holds the client's unique ID, pairing state, and the channel used
/// to deliver server messages to its connection handler. The sender is
/// a non-owning handle; the connection handler owns the receiving end.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Current pairing state
    pub state: ClientState,
    /// Server → Client message channel
    pub sender: mpsc::Sender<ServerMessage>,
}

impl Client {
    /// Create a new idle client with the given ID and sender channel
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id,
            state: ClientState::Idle,
            sender,
        }
    }

    /// Send a message to this client
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub async fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// The partner's ID, if this client is paired
    pub fn partner(&self) -> Option<ClientId> {
        match self.state {
            ClientState::Paired(partner) => Some(partner),
            _ => None,
        }
    }

    /// Check whether this client is waiting for a match
    pub fn is_searching(&self) -> bool {
        self.state == ClientState::Searching
    }

    /// Check whether this client is currently paired
    pub fn is_paired(&self) -> bool {
        matches!(self.state, ClientState::Paired(_))
    }
}
