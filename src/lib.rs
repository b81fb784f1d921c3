//! Anonymous 1:1 Stranger-Chat Server Library
//!
//! A WebSocket server that pairs anonymous clients into one-on-one
//! chat sessions and relays messages between them, built with
//! tokio-tungstenite using the Actor pattern for state management.
//!
//! # Features
//! - WebSocket connection handling
//! - FIFO stranger matchmaking with cancel and "next stranger" skip
//! - Real-time chat message relay
//! - Typing indicators
//! - Online/active-chat count broadcasts
//! - Disconnection handling with partner notification
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the `Matchmaker`
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use stranger_chat::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod handler;
pub mod matchmaker;
pub mod message;
pub mod queue;
pub mod registry;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::{Client, ClientState};
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use matchmaker::Matchmaker;
pub use message::{ClientMessage, ServerMessage};
pub use queue::SearchQueue;
pub use registry::ClientRegistry;
pub use server::{ChatServer, ServerCommand};
pub use types::ClientId;
