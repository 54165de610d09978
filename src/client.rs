//! Async client for either broker endpoint.
//!
//! A producer connects to the client endpoint and uses [`BrokerClient::submit`]
//! and [`BrokerClient::status`]; a worker connects to the worker endpoint and
//! loops over [`BrokerClient::fetch`] and [`BrokerClient::done`]. Calling a
//! method on the wrong endpoint is answered with `ERR` and surfaces as
//! [`BrokerError::Rejected`].

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::Framed;

use crate::error::{BrokerError, Result};
use crate::protocol::{Command, LineCodec, Response};
use crate::scheduler::{JobId, JobState};

pub struct BrokerClient {
    framed: Framed<TcpStream, LineCodec>,
}

impl BrokerClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self {
            framed: Framed::new(stream, LineCodec::new()),
        })
    }

    /// Submit job text; returns the id the broker assigned.
    ///
    /// Text containing a line break is refused before anything is sent.
    pub async fn submit(&mut self, text: &str) -> Result<JobId> {
        if text.contains(['\n', '\r']) {
            return Err(BrokerError::InvalidJobText);
        }
        match self.request(Command::Job(text.to_string())).await? {
            Response::Id(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    /// Returns `None` when the broker has never issued `id`.
    pub async fn status(&mut self, id: JobId) -> Result<Option<JobState>> {
        match self.request(Command::Status(Some(id))).await? {
            Response::Status(state) => Ok(state),
            other => Err(unexpected(other)),
        }
    }

    /// Take the oldest waiting job, if there is one.
    pub async fn fetch(&mut self) -> Result<Option<(JobId, String)>> {
        match self.request(Command::Fetch).await? {
            Response::Job { id, text } => Ok(Some((id, text))),
            Response::NoJob => Ok(None),
            other => Err(unexpected(other)),
        }
    }

    pub async fn done(&mut self, id: JobId) -> Result<()> {
        match self.request(Command::Done(id)).await? {
            Response::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Send a raw line and read back one reply line.
    pub async fn send_line(&mut self, line: &str) -> Result<String> {
        self.framed.send(line).await?;
        match self.framed.next().await {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(e.into()),
            None => Err(BrokerError::ConnectionClosed),
        }
    }

    async fn request(&mut self, command: Command) -> Result<Response> {
        let line = command.to_string();
        let reply = self.send_line(&line).await?;
        match Response::parse(&reply) {
            Some(Response::Err) => Err(BrokerError::Rejected(line)),
            Some(response) => Ok(response),
            None => Err(BrokerError::UnexpectedResponse(reply)),
        }
    }
}

fn unexpected(response: Response) -> BrokerError {
    BrokerError::UnexpectedResponse(response.to_string())
}
