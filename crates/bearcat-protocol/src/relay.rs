//! TCP relay sharing one scanner between several processes.
//!
//! Each accepted client gets its own forwarding task. Bytes read from the
//! client are buffered until a `\r`, and each complete command line is
//! passed unchanged to [`CommandEngine::execute_raw`]; the raw response
//! line is written back. A partial line left when the client disconnects
//! never reaches the scanner. Because `execute_raw` takes the engine's
//! execution lock, relayed commands and local typed commands are
//! serialized against each other.
//!
//! # Example
//!
//! ```no_run
//! use bearcat_protocol::{CommandEngine, relay};
//! # async fn example(engine: CommandEngine) -> bearcat_core::Result<()> {
//! let handle = relay::listen(engine, "0.0.0.0", relay::DEFAULT_RELAY_PORT).await?;
//! println!("relay on {}", handle.local_addr());
//! // ...
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;

use bearcat_core::error::{Error, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::CommandEngine;

pub use bearcat_core::transport::DEFAULT_RELAY_PORT;

/// Largest chunk read from a client in one go, and the longest command
/// line a client may send.
const CLIENT_BUF: usize = 4096;

/// Command line terminator.
const TERMINATOR: u8 = b'\r';

/// Handle to a running relay.
///
/// Dropping the handle leaves the relay running for the life of the
/// runtime; call [`shutdown`](RelayHandle::shutdown) to stop it.
pub struct RelayHandle {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RelayHandle {
    /// The address the relay is bound to (useful when binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Token that stops the relay and every client task when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop accepting clients, disconnect the connected ones, and wait for
    /// the accept loop to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "relay accept task failed");
        }
    }
}

/// Bind `bind_address:bind_port` and start relaying to `engine`.
pub async fn listen(engine: CommandEngine, bind_address: &str, bind_port: u16) -> Result<RelayHandle> {
    let listener = TcpListener::bind((bind_address, bind_port))
        .await
        .map_err(|e| {
            Error::Transport(format!(
                "failed to bind relay on {bind_address}:{bind_port}: {e}"
            ))
        })?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "relay listening");

    let cancel = CancellationToken::new();
    let task = tokio::spawn(accept_loop(listener, engine, cancel.clone()));

    Ok(RelayHandle {
        local_addr,
        cancel,
        task,
    })
}

async fn accept_loop(listener: TcpListener, engine: CommandEngine, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("relay accept loop cancelled");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!(peer = %peer, "relay client connected");
                    tokio::spawn(forward_client(stream, peer, engine.clone(), cancel.child_token()));
                }
                Err(e) => warn!(error = %e, "relay accept failed"),
            },
        }
    }
}

/// Forward one client's command lines until it disconnects or fails.
/// Errors end this client only.
async fn forward_client(
    mut stream: TcpStream,
    peer: SocketAddr,
    engine: CommandEngine,
    cancel: CancellationToken,
) {
    if let Err(e) = stream.set_nodelay(true) {
        warn!(peer = %peer, error = %e, "failed to set TCP_NODELAY");
    }
    let mut buf = vec![0u8; CLIENT_BUF];
    let mut pending: Vec<u8> = Vec::new();

    'client: loop {
        let n = tokio::select! {
            _ = cancel.cancelled() => break,
            read = stream.read(&mut buf) => match read {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!(peer = %peer, error = %e, "relay client read failed");
                    break;
                }
            },
        };
        pending.extend_from_slice(&buf[..n]);

        while let Some(pos) = pending.iter().position(|&b| b == TERMINATOR) {
            let frame: Vec<u8> = pending.drain(..=pos).collect();
            if let Err(e) = relay_frame(&mut stream, peer, &engine, &frame).await {
                warn!(peer = %peer, error = %e, "dropping relay client");
                break 'client;
            }
        }

        if pending.len() > CLIENT_BUF {
            warn!(
                peer = %peer,
                len = pending.len(),
                "unterminated command too long, dropping relay client"
            );
            break;
        }
    }

    if !pending.is_empty() {
        debug!(
            peer = %peer,
            partial = %String::from_utf8_lossy(&pending).escape_debug(),
            "discarding unterminated command"
        );
    }
    info!(peer = %peer, "relay client disconnected");
}

/// Run one complete command line against the scanner and write the
/// response back to the client.
async fn relay_frame(
    stream: &mut TcpStream,
    peer: SocketAddr,
    engine: &CommandEngine,
    frame: &[u8],
) -> Result<()> {
    debug!(
        peer = %peer,
        command = %String::from_utf8_lossy(frame).escape_debug(),
        "relaying"
    );
    let response = engine.execute_raw(frame).await?;
    stream.write_all(&response).await?;
    Ok(())
}
