//! Control-Plane Listener
//!
//! One per node: owns the control socket, decodes each inbound frame and
//! answers it. Handling is task-per-datagram so a push that has to wait on
//! a busy shard never delays the next receive.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::net::UdpSocket;

use crate::directory::types::NodeName;
use crate::records::store::RecordStore;

use super::protocol::{ControlRequest, RESPONSE_FAILURE};

const RECV_BUFFER_SIZE: usize = 65536;

pub struct ControlListener {
    node_name: NodeName,
    socket: Arc<UdpSocket>,
    store: Arc<RecordStore>,
}

impl ControlListener {
    /// Binds the control socket. Serving starts with
    /// [`ControlListener::start`].
    pub async fn bind(
        bind_addr: SocketAddr,
        node_name: NodeName,
        store: Arc<RecordStore>,
    ) -> Result<Arc<Self>> {
        let socket = UdpSocket::bind(bind_addr).await?;
        tracing::info!("Control listener for {} bound on {}", node_name, socket.local_addr()?);

        Ok(Arc::new(Self {
            node_name,
            socket: Arc::new(socket),
            store,
        }))
    }

    /// Address the control socket actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub async fn start(self: Arc<Self>) {
        let _receive_handle = {
            let listener = self.clone();
            tokio::spawn(async move {
                listener.receive_loop().await;
            })
        };
    }

    async fn receive_loop(self: Arc<Self>) {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];

        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, src)) => {
                    let raw = String::from_utf8_lossy(&buf[..len]).into_owned();
                    let listener = self.clone();
                    tokio::spawn(async move {
                        listener.handle_frame(raw, src).await;
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to receive control datagram: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }

    async fn handle_frame(&self, raw: String, src: SocketAddr) {
        let reply = match ControlRequest::parse(&raw) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                tracing::warn!("Rejected control frame from {}: {}", src, e);
                RESPONSE_FAILURE.to_string()
            }
        };

        if let Err(e) = self.socket.send_to(reply.as_bytes(), src).await {
            tracing::warn!("Failed to reply to {}: {}", src, e);
        }
    }

    /// Applies one decoded request and produces the reply text. Count
    /// queries read the running counter; pushes insert unless the
    /// identifier is already present, so a retried push is acknowledged
    /// without a second copy.
    async fn dispatch(&self, request: ControlRequest) -> String {
        match request {
            ControlRequest::GetCount => {
                let count = self.store.count();
                tracing::debug!("Node {} answered count query with {}", self.node_name, count);
                count.to_string()
            }
            ControlRequest::Push { manager_id, record } => {
                let id = record.id();
                if self.store.insert_if_absent(record).await {
                    tracing::info!(
                        "Node {} accepted record {} pushed by {}",
                        self.node_name,
                        id,
                        manager_id
                    );
                } else {
                    tracing::info!(
                        "Node {} already holds record {}, acknowledging push by {}",
                        self.node_name,
                        id,
                        manager_id
                    );
                }
                id.to_string()
            }
        }
    }
}
