//! Line protocol spoken on both broker endpoints.
//!
//! Every request and every reply is a single `\n`-terminated line of
//! plain text:
//!
//! ```text
//! client:  JOB <text>    -> ID <id>
//!          STATUS <id>   -> waiting | running | completed | unknown
//! worker:  FETCH         -> JOB <id> <text> | NOJOB
//!          DONE <id>     -> OK
//! any:     (invalid)     -> ERR
//! ```
//!
//! - [`LineCodec`]: turns a byte stream into lines and back
//! - [`Command`]: a parsed request
//! - [`Response`]: a reply, as written by the broker or read by a peer

pub mod codec;
pub mod command;

pub use codec::LineCodec;
pub use command::{Command, Response};

/// Which endpoint a connection arrived on. Fixed for the connection's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Worker,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Worker => write!(f, "worker"),
        }
    }
}
