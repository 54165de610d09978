use std::net::SocketAddr;

use thiserror::Error;

use crate::protocol::Role;
use crate::scheduler::{JobId, JobState};

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Failed to bind {role} listener on {addr}: {source}")]
    Bind {
        role: Role,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Job text is empty")]
    EmptyJobText,

    #[error("Job text must fit on one line")]
    InvalidJobText,

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: JobId,
        from: JobState,
        to: JobState,
    },

    #[error("Broker is not running")]
    BrokerClosed,

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Request rejected by broker: {0}")]
    Rejected(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BrokerError>;
