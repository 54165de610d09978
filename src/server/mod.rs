//! Connection multiplexer.
//!
//! Owns the two listening sockets. Every accepted socket becomes its own
//! task whose role is fixed by the listener that accepted it; a slow or
//! dead peer only ever stalls its own task.

pub mod connection;

use std::io;
use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::broker::BrokerHandle;
use crate::config::BrokerConfig;
use crate::error::{BrokerError, Result};
use crate::protocol::Role;

pub use connection::Connection;

pub struct Server {
    client_listener: TcpListener,
    worker_listener: TcpListener,
    broker: BrokerHandle,
}

impl Server {
    /// Bind both endpoints. Either bind failing is fatal to startup.
    pub async fn bind(config: &BrokerConfig, broker: BrokerHandle) -> Result<Self> {
        let client_listener = bind_listener(Role::Client, config.client_addr).await?;
        let worker_listener = bind_listener(Role::Worker, config.worker_addr).await?;

        Ok(Self {
            client_listener,
            worker_listener,
            broker,
        })
    }

    pub fn client_addr(&self) -> io::Result<SocketAddr> {
        self.client_listener.local_addr()
    }

    pub fn worker_addr(&self) -> io::Result<SocketAddr> {
        self.worker_listener.local_addr()
    }

    /// Accept connections on both endpoints until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            client_addr = ?self.client_addr().ok(),
            worker_addr = ?self.worker_addr().ok(),
            "Broker listening"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = self.client_listener.accept() => {
                    self.register(Role::Client, accepted, &shutdown);
                }
                accepted = self.worker_listener.accept() => {
                    self.register(Role::Worker, accepted, &shutdown);
                }
            }
        }
    }

    fn register(
        &self,
        role: Role,
        accepted: io::Result<(TcpStream, SocketAddr)>,
        shutdown: &CancellationToken,
    ) {
        match accepted {
            Ok((stream, peer)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    tracing::debug!(%peer, error = %e, "Failed to set TCP_NODELAY");
                }
                let connection = Connection::new(stream, peer, role);
                tokio::spawn(connection.serve(self.broker.clone(), shutdown.child_token()));
            }
            Err(e) => {
                tracing::warn!(%role, error = %e, "Failed to accept connection");
            }
        }
    }
}

async fn bind_listener(role: Role, addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| BrokerError::Bind { role, addr, source })
}
