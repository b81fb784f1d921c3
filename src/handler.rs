//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake,
//! message parsing, and bidirectional communication with the ChatServer.
//!
//! Malformed frames never reach the matchmaker: invalid JSON and
//! unparseable id fields are logged and dropped here.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::message::{ClientMessage, ServerMessage};
use crate::server::ServerCommand;
use crate::types::ClientId;

/// Handle a new TCP connection
///
/// Performs WebSocket handshake, registers with the ChatServer (which
/// allocates the client id), sets up bidirectional communication, and
/// manages the connection lifecycle.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Create channel for server -> client messages
    let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(32);

    // Register with ChatServer; the server allocates our id
    let (reply_tx, reply_rx) = oneshot::channel();
    if cmd_tx
        .send(ServerCommand::Connect {
            sender: msg_tx,
            reply: reply_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client from {} - server closed", peer_addr);
        return Err(AppError::ChannelSend);
    }
    let client_id = reply_rx.await.map_err(|_| AppError::ChannelSend)?;

    info!("Client {} connected from {}", client_id, peer_addr);

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (WebSocket -> ServerCommand)
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(client_msg) => {
                            let Some(cmd) = client_message_to_command(client_id, client_msg)
                            else {
                                warn!("Unparseable id field from {}, dropping", client_id);
                                continue;
                            };
                            if cmd_tx_read.send(cmd).await.is_err() {
                                debug!("Server closed, ending read task for {}", client_id);
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid JSON from {}: {}", client_id, e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(Message::Ping(_)) => {
                    // Pong is handled automatically by tungstenite
                    debug!("Ping from {}", client_id);
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", client_id);
                }
                Ok(_) => {
                    // Binary or other message types - ignore
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Spawn write task (ServerMessage -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize message: {}", e);
                    // Continue - don't break on serialization errors
                }
            }
        }
        debug!("Write task ended for client");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", client_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", client_id);
        }
    }

    // Send disconnect command
    let _ = cmd_tx
        .send(ServerCommand::Disconnect { client_id })
        .await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Convert a ClientMessage to a ServerCommand
///
/// Returns None when an id field does not parse; such messages are
/// dropped at this boundary and never reach the matchmaker.
fn client_message_to_command(client_id: ClientId, msg: ClientMessage) -> Option<ServerCommand> {
    let cmd = match msg {
        ClientMessage::FindStranger => ServerCommand::FindStranger { client_id },
        ClientMessage::CancelSearch => ServerCommand::CancelSearch { client_id },
        ClientMessage::NextStranger { current_stranger_id } => ServerCommand::NextStranger {
            client_id,
            current_stranger_id: ClientId::parse(&current_stranger_id)?,
        },
        ClientMessage::Disconnect { stranger_id } => ServerCommand::DisconnectPartner {
            client_id,
            stranger_id: ClientId::parse(&stranger_id)?,
        },
        ClientMessage::Message { message } => ServerCommand::Message { client_id, message },
        ClientMessage::Typing { is_typing } => ServerCommand::Typing {
            client_id,
            is_typing,
        },
        ClientMessage::GetOnlineCount => ServerCommand::GetOnlineCount { client_id },
    };
    Some(cmd)
}
