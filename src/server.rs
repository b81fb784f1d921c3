//! ChatServer Actor implementation
//!
//! The central actor owning the matchmaker. Uses the Actor pattern with
//! mpsc channels for message passing: every command is processed to
//! completion before the next one starts, so registry and queue state
//! are never observed mid-transition.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::matchmaker::Matchmaker;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Commands sent from handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected; the allocated id is sent back on `reply`
    Connect {
        sender: mpsc::Sender<ServerMessage>,
        reply: oneshot::Sender<ClientId>,
    },
    /// Client connection closed
    Disconnect { client_id: ClientId },
    /// Client wants a stranger to chat with
    FindStranger { client_id: ClientId },
    /// Client stopped waiting for a stranger
    CancelSearch { client_id: ClientId },
    /// Client skips to a new stranger
    NextStranger {
        client_id: ClientId,
        current_stranger_id: ClientId,
    },
    /// Client leaves its current stranger without searching again
    DisconnectPartner {
        client_id: ClientId,
        stranger_id: ClientId,
    },
    /// Chat message for the client's stranger
    Message { client_id: ClientId, message: String },
    /// Typing indicator for the client's stranger
    Typing { client_id: ClientId, is_typing: bool },
    /// Client asked for the current counts
    GetOnlineCount { client_id: ClientId },
    /// Periodic timer tick: push counts to everyone
    BroadcastCounts,
}

/// The main ChatServer actor
///
/// Owns the matchmaker and processes commands from connection handlers
/// and the broadcast timer.
pub struct ChatServer {
    matchmaker: Matchmaker,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            matchmaker: Matchmaker::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { sender, reply } => {
                self.handle_connect(sender, reply).await;
            }
            ServerCommand::Disconnect { client_id } => {
                info!("Client {} disconnected", client_id);
                self.matchmaker.remove_client(client_id).await;
                self.broadcast_counts().await;
            }
            ServerCommand::FindStranger { client_id } => {
                self.matchmaker.find_partner(client_id).await;
                self.broadcast_counts().await;
            }
            ServerCommand::CancelSearch { client_id } => {
                self.matchmaker.cancel_search(client_id).await;
                self.broadcast_counts().await;
            }
            ServerCommand::NextStranger {
                client_id,
                current_stranger_id,
            } => {
                self.matchmaker
                    .next_partner(client_id, current_stranger_id)
                    .await;
                self.broadcast_counts().await;
            }
            ServerCommand::DisconnectPartner {
                client_id,
                stranger_id,
            } => {
                self.matchmaker.disconnect(client_id, stranger_id);
                self.broadcast_counts().await;
            }
            ServerCommand::Message { client_id, message } => {
                self.matchmaker.relay_message(client_id, message).await;
                self.broadcast_counts().await;
            }
            ServerCommand::Typing {
                client_id,
                is_typing,
            } => {
                self.matchmaker.relay_typing(client_id, is_typing).await;
                self.broadcast_counts().await;
            }
            ServerCommand::GetOnlineCount { client_id } => {
                self.send_counts(client_id).await;
            }
            ServerCommand::BroadcastCounts => {
                self.broadcast_counts().await;
            }
        }
    }

    /// Handle new client connection
    async fn handle_connect(
        &mut self,
        sender: mpsc::Sender<ServerMessage>,
        reply: oneshot::Sender<ClientId>,
    ) {
        let client_id = self.matchmaker.add_client(sender);
        info!("Client {} connected", client_id);

        // Handler may have given up already; nothing to do if so
        let _ = reply.send(client_id);

        self.send_counts(client_id).await;
        debug!("Total clients: {}", self.matchmaker.online_count());
    }

    /// Send current counts to a single client
    async fn send_counts(&self, client_id: ClientId) {
        let online = self.matchmaker.online_count();
        let chats = self.matchmaker.active_chats();

        if let Some(client) = self.matchmaker.registry().get(client_id) {
            let _ = client.send(ServerMessage::OnlineCount { count: online }).await;
            let _ = client.send(ServerMessage::ActiveChats { count: chats }).await;
        }
    }

    /// Push current counts to every connected client
    async fn broadcast_counts(&self) {
        let online = self.matchmaker.online_count();
        let chats = self.matchmaker.active_chats();

        for client in self.matchmaker.registry().iter() {
            let _ = client.send(ServerMessage::OnlineCount { count: online }).await;
            let _ = client.send(ServerMessage::ActiveChats { count: chats }).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connect(server: &mut ChatServer) -> (ClientId, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(64);
        let (reply_tx, reply_rx) = oneshot::channel();
        server
            .handle_command(ServerCommand::Connect {
                sender: tx,
                reply: reply_tx,
            })
            .await;
        (reply_rx.await.unwrap(), rx)
    }

    fn new_server() -> ChatServer {
        let (_tx, rx) = mpsc::channel(8);
        ChatServer::new(rx)
    }

    #[tokio::test]
    async fn test_connect_sends_initial_counts() {
        let mut server = new_server();
        let (_id, mut rx) = connect(&mut server).await;

        assert!(matches!(
            rx.try_recv().unwrap(),
            ServerMessage::OnlineCount { count: 1 }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            ServerMessage::ActiveChats { count: 0 }
        ));
    }

    #[tokio::test]
    async fn test_find_and_chat_flow() {
        let mut server = new_server();
        let (a, mut rx_a) = connect(&mut server).await;
        let (b, mut rx_b) = connect(&mut server).await;

        server
            .handle_command(ServerCommand::FindStranger { client_id: a })
            .await;
        server
            .handle_command(ServerCommand::FindStranger { client_id: b })
            .await;

        // Skip count traffic; the next pairing-related message is Matched
        let matched_a = drain_until_matched(&mut rx_a);
        let matched_b = drain_until_matched(&mut rx_b);
        assert_eq!(matched_a, b.to_string());
        assert_eq!(matched_b, a.to_string());

        server
            .handle_command(ServerCommand::Message {
                client_id: a,
                message: "hi".to_string(),
            })
            .await;

        loop {
            match rx_b.try_recv().unwrap() {
                ServerMessage::Message { message } => {
                    assert_eq!(message, "hi");
                    break;
                }
                _ => continue,
            }
        }
    }

    #[tokio::test]
    async fn test_disconnect_notifies_partner() {
        let mut server = new_server();
        let (a, _rx_a) = connect(&mut server).await;
        let (b, mut rx_b) = connect(&mut server).await;

        server
            .handle_command(ServerCommand::FindStranger { client_id: a })
            .await;
        server
            .handle_command(ServerCommand::FindStranger { client_id: b })
            .await;
        server
            .handle_command(ServerCommand::Disconnect { client_id: a })
            .await;

        let mut saw_disconnected = false;
        while let Ok(msg) = rx_b.try_recv() {
            if matches!(msg, ServerMessage::Disconnected) {
                saw_disconnected = true;
            }
        }
        assert!(saw_disconnected);
    }

    #[tokio::test]
    async fn test_broadcast_counts() {
        let mut server = new_server();
        let (_a, mut rx_a) = connect(&mut server).await;
        while rx_a.try_recv().is_ok() {}

        server.handle_command(ServerCommand::BroadcastCounts).await;

        assert!(matches!(
            rx_a.try_recv().unwrap(),
            ServerMessage::OnlineCount { count: 1 }
        ));
        assert!(matches!(
            rx_a.try_recv().unwrap(),
            ServerMessage::ActiveChats { count: 0 }
        ));
    }

    #[tokio::test]
    async fn test_chat_traffic_triggers_count_broadcast() {
        let mut server = new_server();
        let (a, _rx_a) = connect(&mut server).await;
        let (b, _rx_b) = connect(&mut server).await;
        let (_c, mut rx_c) = connect(&mut server).await;

        server
            .handle_command(ServerCommand::FindStranger { client_id: a })
            .await;
        server
            .handle_command(ServerCommand::FindStranger { client_id: b })
            .await;
        while rx_c.try_recv().is_ok() {}

        // Relay events refresh everyone's counts, like any other event
        server
            .handle_command(ServerCommand::Message {
                client_id: a,
                message: "hi".to_string(),
            })
            .await;

        assert!(matches!(
            rx_c.try_recv().unwrap(),
            ServerMessage::OnlineCount { count: 3 }
        ));
        assert!(matches!(
            rx_c.try_recv().unwrap(),
            ServerMessage::ActiveChats { count: 1 }
        ));

        while rx_c.try_recv().is_ok() {}
        server
            .handle_command(ServerCommand::Typing {
                client_id: a,
                is_typing: true,
            })
            .await;

        assert!(matches!(
            rx_c.try_recv().unwrap(),
            ServerMessage::OnlineCount { count: 3 }
        ));
    }

    #[tokio::test]
    async fn test_get_online_count_replies_to_requester_only() {
        let mut server = new_server();
        let (a, mut rx_a) = connect(&mut server).await;
        let (_b, mut rx_b) = connect(&mut server).await;
        while rx_a.try_recv().is_ok() {}
        while rx_b.try_recv().is_ok() {}

        server
            .handle_command(ServerCommand::GetOnlineCount { client_id: a })
            .await;

        assert!(matches!(
            rx_a.try_recv().unwrap(),
            ServerMessage::OnlineCount { count: 2 }
        ));
        assert!(matches!(
            rx_a.try_recv().unwrap(),
            ServerMessage::ActiveChats { count: 0 }
        ));
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
    }

    fn drain_until_matched(rx: &mut mpsc::Receiver<ServerMessage>) -> String {
        loop {
            match rx.try_recv().expect("expected a Matched message") {
                ServerMessage::Matched { stranger_id } => return stranger_id,
                _ => continue,
            }
        }
    }
}
