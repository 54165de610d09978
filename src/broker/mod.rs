//! The broker task: sole owner of job state.
//!
//! Connection tasks never see the [`JobAssigner`]. They send each framed
//! line through a [`BrokerHandle`] and wait for the reply, and the broker
//! applies lines one at a time in mailbox order.

pub mod dispatcher;

use tokio::sync::{mpsc, oneshot};

use crate::error::{BrokerError, Result};
use crate::protocol::{Response, Role};
use crate::scheduler::JobAssigner;

pub use dispatcher::dispatch;

/// Message types for the broker event loop
#[derive(Debug)]
pub enum BrokerMessage {
    /// One framed line received on a connection
    Dispatch {
        role: Role,
        line: String,
        response_tx: oneshot::Sender<Option<Response>>,
    },
}

pub struct Broker {
    assigner: JobAssigner,
    message_rx: mpsc::Receiver<BrokerMessage>,
}

/// Cloneable sender side of the broker mailbox.
#[derive(Debug, Clone)]
pub struct BrokerHandle {
    message_tx: mpsc::Sender<BrokerMessage>,
}

impl Broker {
    pub fn new(mailbox_capacity: usize) -> (Self, BrokerHandle) {
        let (message_tx, message_rx) = mpsc::channel(mailbox_capacity);

        let broker = Self {
            assigner: JobAssigner::new(),
            message_rx,
        };

        (broker, BrokerHandle { message_tx })
    }

    /// Run the broker main loop until every handle has been dropped.
    pub async fn run(mut self) {
        tracing::debug!("Broker loop started");

        while let Some(msg) = self.message_rx.recv().await {
            match msg {
                BrokerMessage::Dispatch {
                    role,
                    line,
                    response_tx,
                } => {
                    let response = dispatch(&mut self.assigner, role, &line);
                    // The connection may have gone away while queued.
                    let _ = response_tx.send(response);
                }
            }
        }

        tracing::debug!(
            jobs = self.assigner.len(),
            pending = self.assigner.pending_len(),
            "Broker loop stopped"
        );
    }
}

impl BrokerHandle {
    /// Hand a line to the broker and wait for its reply.
    pub async fn dispatch(&self, role: Role, line: String) -> Result<Option<Response>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.message_tx
            .send(BrokerMessage::Dispatch {
                role,
                line,
                response_tx,
            })
            .await
            .map_err(|_| BrokerError::BrokerClosed)?;
        response_rx.await.map_err(|_| BrokerError::BrokerClosed)
    }
}
