//! Client registry
//!
//! Owns the set of connected client records. Uses HashMap for O(1)
//! lookups by id. Removal does not cascade: unwinding pairing or queue
//! membership is the matchmaker's job before it deletes the record.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::client::Client;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Registry of all connected clients
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<ClientId, Client>,
}

impl ClientRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Allocate a new identity and register an idle client for it
    ///
    /// Returns the new id. Ids are random UUIDs and never reused.
    pub fn add(&mut self, sender: mpsc::Sender<ServerMessage>) -> ClientId {
        let id = ClientId::new();
        self.clients.insert(id, Client::new(id, sender));
        id
    }

    /// Delete the record for `id` if present; no-op otherwise
    pub fn remove(&mut self, id: ClientId) {
        self.clients.remove(&id);
    }

    /// Look up a client by id
    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    /// Look up a client by id, mutably
    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// Number of connected clients
    pub fn count(&self) -> usize {
        self.clients.len()
    }

    /// Number of clients currently in a pairing
    ///
    /// Always even while the registry is consistent; callers divide by
    /// two (floored) to get the number of active chats.
    pub fn paired_count(&self) -> usize {
        self.clients.values().filter(|c| c.is_paired()).count()
    }

    /// Iterate over all connected clients
    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }
}
