use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_CLIENT_PORT: u16 = 50000;
pub const DEFAULT_WORKER_PORT: u16 = 50001;
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Address producers connect to (`JOB`, `STATUS`)
    pub client_addr: SocketAddr,
    /// Address workers connect to (`FETCH`, `DONE`)
    pub worker_addr: SocketAddr,
    /// Lines that may be queued for the broker task before connections
    /// start waiting for room.
    pub mailbox_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self::with_ports(DEFAULT_CLIENT_PORT, DEFAULT_WORKER_PORT)
    }
}

impl BrokerConfig {
    pub fn new(client_addr: SocketAddr, worker_addr: SocketAddr) -> Self {
        Self {
            client_addr,
            worker_addr,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }

    /// Listen on all IPv4 interfaces with the given ports.
    pub fn with_ports(client_port: u16, worker_port: u16) -> Self {
        let any = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        Self::new(
            SocketAddr::new(any, client_port),
            SocketAddr::new(any, worker_port),
        )
    }

    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity.max(1);
        self
    }
}
