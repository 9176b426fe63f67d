use std::net::SocketAddr;
use std::sync::Arc;

use record_federation::control::client::ControlClient;
use record_federation::control::listener::ControlListener;
use record_federation::directory::types::{NodeDirectory, NodeEntry, NodeName};
use record_federation::node::handlers::router;
use record_federation::node::service::NodeService;
use record_federation::records::store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 5 {
        eprintln!(
            "Usage: {} --name <NODE> --member <NAME=host:client_port:control_port> [--member ...]",
            args[0]
        );
        eprintln!(
            "Example: {} --name MTL --member MTL=127.0.0.1:4000:5000 --member LVL=127.0.0.1:4001:5001",
            args[0]
        );

        std::process::exit(1);
    }

    let mut node_name: Option<String> = None;
    let mut members: Vec<NodeEntry> = vec![];

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                node_name = Some(args[i + 1].clone());
                i += 2;
            }
            "--member" => {
                members.push(NodeEntry::parse(&args[i + 1])?);
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let node_name = NodeName(node_name.expect("--name is required"));
    let directory = Arc::new(NodeDirectory::new(node_name.clone(), members)?);
    let local = directory.local_entry().clone();

    tracing::info!(
        "Starting node {} of a {}-member federation",
        node_name,
        directory.len()
    );

    // 1. Record store:
    let store = Arc::new(RecordStore::new());

    // 2. Control plane (UDP):
    let control_addr: SocketAddr = format!("0.0.0.0:{}", local.control_port).parse()?;
    let control = ControlListener::bind(control_addr, node_name.clone(), store.clone()).await?;
    control.start().await;

    // 3. Manager-facing service:
    let service = NodeService::new(directory.clone(), store.clone(), ControlClient::new());

    // 4. HTTP router:
    let app = router(service);

    // 5. Spawn stats reporter:
    let stats_store = store.clone();
    let stats_name = node_name.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));

        loop {
            interval.tick().await;
            tracing::info!(
                "Node {} holds {} records across {} shards",
                stats_name,
                stats_store.count(),
                stats_store.shard_count()
            );
        }
    });

    // 6. Start HTTP server:
    let client_addr: SocketAddr = format!("0.0.0.0:{}", local.client_port).parse()?;

    tracing::info!("Client API listening on {}", client_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(client_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
