//! Host container module
//!
//! Accept loop and connection serving. The dispatch core never sees
//! sockets; this layer adapts between the network and the request/
//! response abstractions.

mod conn;
mod listener;

pub use listener::create_reusable_listener;

use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::logger;

/// Accept connections until the process is terminated.
pub async fn run(
    listener: tokio::net::TcpListener,
    dispatcher: Arc<Dispatcher>,
    config: Arc<Config>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                conn::handle_connection(
                    stream,
                    peer_addr,
                    Arc::clone(&dispatcher),
                    Arc::clone(&config),
                );
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
