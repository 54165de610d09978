use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;

use crate::broker::BrokerHandle;
use crate::protocol::{LineCodec, Role};

/// One accepted socket. Pure transport: it carries no job state between
/// lines, and dropping it discards its buffers and any unsent reply.
pub struct Connection {
    framed: Framed<TcpStream, LineCodec>,
    peer: SocketAddr,
    role: Role,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, role: Role) -> Self {
        Self {
            framed: Framed::new(stream, LineCodec::new()),
            peer,
            role,
        }
    }

    /// Read lines until the peer hangs up, the socket fails or shutdown is
    /// requested, answering each line before reading the next.
    pub async fn serve(mut self, broker: BrokerHandle, shutdown: CancellationToken) {
        let (peer, role) = (self.peer, self.role);
        tracing::debug!(%peer, %role, "Connection opened");

        loop {
            let next = tokio::select! {
                _ = shutdown.cancelled() => break,
                next = self.framed.next() => next,
            };

            let line = match next {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    tracing::debug!(%peer, %role, error = %e, "Read failed, closing connection");
                    break;
                }
                None => break,
            };

            let response = match broker.dispatch(role, line).await {
                Ok(Some(response)) => response,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(%peer, %role, error = %e, "Broker unavailable, closing connection");
                    break;
                }
            };

            if let Err(e) = self.framed.send(response.to_string()).await {
                tracing::debug!(%peer, %role, error = %e, "Write failed, closing connection");
                break;
            }
        }

        tracing::debug!(%peer, %role, "Connection closed");
    }
}
