use clap::Parser;
use tracing_subscriber::EnvFilter;

use workqueue::broker::Broker;
use workqueue::config::{BrokerConfig, DEFAULT_CLIENT_PORT, DEFAULT_WORKER_PORT};
use workqueue::error::Result;
use workqueue::server::Server;
use workqueue::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "workqueue")]
#[command(version)]
#[command(about = "Job broker: clients submit text jobs, workers fetch and complete them")]
struct Args {
    /// Port for client connections (JOB, STATUS)
    #[arg(default_value_t = DEFAULT_CLIENT_PORT)]
    client_port: u16,

    /// Port for worker connections (FETCH, DONE)
    #[arg(default_value_t = DEFAULT_WORKER_PORT)]
    worker_port: u16,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BrokerConfig::with_ports(args.client_port, args.worker_port);
    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Broker failed to start");
        std::process::exit(1);
    }
}

async fn run(config: BrokerConfig) -> Result<()> {
    let (broker, handle) = Broker::new(config.mailbox_capacity);
    let server = Server::bind(&config, handle).await?;
    let shutdown = install_shutdown_handler()?;

    let broker_task = tokio::spawn(broker.run());
    server.run(shutdown).await;
    broker_task.abort();
    Ok(())
}
