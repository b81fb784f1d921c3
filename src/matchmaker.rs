//! Matchmaking engine
//!
//! Pairs searching clients FIFO and relays chat traffic between paired
//! clients. Owns the `ClientRegistry` and `SearchQueue` as a single
//! aggregate; the `ChatServer` actor serializes all access, so no
//! operation here ever observes a half-applied transition.
//!
//! Every failure mode (unknown id, stale partner reference, stale queue
//! candidate) is a silent no-op. Clients race their disconnects against
//! pairing changes all the time; none of those races are errors.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::client::ClientState;
use crate::message::ServerMessage;
use crate::queue::SearchQueue;
use crate::registry::ClientRegistry;
use crate::types::ClientId;

/// Pairing state machine plus message relay
///
/// State transitions per client:
/// `Idle → Searching` (find), `Searching → Paired` (match),
/// `Searching → Idle` (cancel), `Paired → Idle` (partner left or
/// one-sided disconnect), and any state `→` removed (connection loss).
#[derive(Debug, Default)]
pub struct Matchmaker {
    registry: ClientRegistry,
    queue: SearchQueue,
}

impl Matchmaker {
    /// Create an empty matchmaker
    pub fn new() -> Self {
        Self {
            registry: ClientRegistry::new(),
            queue: SearchQueue::new(),
        }
    }

    /// Register a newly connected client, returning its id
    pub fn add_client(&mut self, sender: mpsc::Sender<ServerMessage>) -> ClientId {
        let id = self.registry.add(sender);
        debug!("Client {} registered, {} online", id, self.registry.count());
        id
    }

    /// Handle a client leaving the system entirely
    ///
    /// Unwinds pairing (the partner is notified and left `Idle`; it
    /// must explicitly search again) and queue membership, then deletes
    /// the record. Idempotent: unknown ids are a no-op.
    pub async fn remove_client(&mut self, id: ClientId) {
        let Some(client) = self.registry.get(id) else {
            return;
        };
        let state = client.state;

        match state {
            ClientState::Paired(partner_id) => {
                if let Some(partner) = self.registry.get_mut(partner_id) {
                    partner.state = ClientState::Idle;
                }
                if let Some(partner) = self.registry.get(partner_id) {
                    let _ = partner.send(ServerMessage::Disconnected).await;
                }
            }
            ClientState::Searching => {
                self.queue.remove(id);
            }
            ClientState::Idle => {}
        }

        self.registry.remove(id);
        debug!("Client {} removed, {} online", id, self.registry.count());
    }

    /// Start searching for a partner
    ///
    /// No-op if the client is unknown, already searching, or still
    /// paired (a paired client must disconnect first). Matches against
    /// the longest-waiting valid queue entry; stale entries (clients
    /// that vanished or stopped searching between enqueue and pop) are
    /// discarded. If no valid candidate exists the client is queued.
    pub async fn find_partner(&mut self, id: ClientId) {
        let Some(client) = self.registry.get(id) else {
            return;
        };
        if client.is_searching() || client.is_paired() {
            return;
        }

        if let Some(client) = self.registry.get_mut(id) {
            client.state = ClientState::Searching;
        }

        while let Some(candidate_id) = self.queue.pop_front() {
            let valid = candidate_id != id
                && self
                    .registry
                    .get(candidate_id)
                    .is_some_and(|c| c.is_searching());
            if !valid {
                debug!("Discarding stale queue entry {}", candidate_id);
                continue;
            }

            self.pair(id, candidate_id).await;
            return;
        }

        // Queue exhausted: wait for the next searcher
        self.queue.push(id);
        debug!("Client {} queued, {} waiting", id, self.queue.len());
    }

    /// Transition both clients to `Paired` and notify them
    async fn pair(&mut self, id: ClientId, candidate_id: ClientId) {
        if let Some(client) = self.registry.get_mut(id) {
            client.state = ClientState::Paired(candidate_id);
        }
        if let Some(candidate) = self.registry.get_mut(candidate_id) {
            candidate.state = ClientState::Paired(id);
        }

        info!("Matched {} with {}", id, candidate_id);

        if let Some(client) = self.registry.get(id) {
            let _ = client
                .send(ServerMessage::Matched {
                    stranger_id: candidate_id.to_string(),
                })
                .await;
        }
        if let Some(candidate) = self.registry.get(candidate_id) {
            let _ = candidate
                .send(ServerMessage::Matched {
                    stranger_id: id.to_string(),
                })
                .await;
        }
    }

    /// Stop searching; silent no-op unless the client is `Searching`
    pub async fn cancel_search(&mut self, id: ClientId) {
        let Some(client) = self.registry.get(id) else {
            return;
        };
        if !client.is_searching() {
            return;
        }

        self.queue.remove(id);
        if let Some(client) = self.registry.get_mut(id) {
            client.state = ClientState::Idle;
        }
        if let Some(client) = self.registry.get(id) {
            let _ = client.send(ServerMessage::SearchCanceled).await;
        }
    }

    /// One-sided unpair: clear `id`'s pairing if it currently points at
    /// `stranger_id`
    ///
    /// Only the caller's own state changes; the partner learns about
    /// the break-up through its own disconnect or through connection
    /// loss. A mismatched `stranger_id` means the message raced a
    /// pairing change and is ignored.
    pub fn disconnect(&mut self, id: ClientId, stranger_id: ClientId) {
        if let Some(client) = self.registry.get_mut(id) {
            if client.state == ClientState::Paired(stranger_id) {
                client.state = ClientState::Idle;
            }
        }
    }

    /// Skip to a new stranger: unpair from the current one, then search
    pub async fn next_partner(&mut self, id: ClientId, current_stranger_id: ClientId) {
        self.disconnect(id, current_stranger_id);
        self.find_partner(id).await;
    }

    /// Relay a chat message to the sender's partner
    ///
    /// Silently dropped when the sender is unknown or unpaired.
    pub async fn relay_message(&mut self, id: ClientId, message: String) {
        let Some(partner_id) = self.registry.get(id).and_then(|c| c.partner()) else {
            return;
        };
        if let Some(partner) = self.registry.get(partner_id) {
            let _ = partner.send(ServerMessage::Message { message }).await;
        }
    }

    /// Relay a typing indicator to the sender's partner
    pub async fn relay_typing(&mut self, id: ClientId, is_typing: bool) {
        let Some(partner_id) = self.registry.get(id).and_then(|c| c.partner()) else {
            return;
        };
        if let Some(partner) = self.registry.get(partner_id) {
            let _ = partner.send(ServerMessage::Typing { is_typing }).await;
        }
    }

    /// Number of connected clients
    pub fn online_count(&self) -> usize {
        self.registry.count()
    }

    /// Number of chats in progress (two paired clients each)
    pub fn active_chats(&self) -> usize {
        self.registry.paired_count() / 2
    }

    /// Access the registry, e.g. to iterate clients for a broadcast
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }
}
