//! Transfer Coordinator
//!
//! Drives the push-then-delete sequence for one record at a time.

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::control::client::ControlClient;
use crate::control::protocol::ControlRequest;
use crate::directory::types::{NodeDirectory, NodeName};
use crate::records::store::RecordStore;
use crate::records::types::RecordId;

pub struct TransferCoordinator {
    store: Arc<RecordStore>,
    directory: Arc<NodeDirectory>,
    client: ControlClient,
}

impl TransferCoordinator {
    pub fn new(
        store: Arc<RecordStore>,
        directory: Arc<NodeDirectory>,
        client: ControlClient,
    ) -> Self {
        Self {
            store,
            directory,
            client,
        }
    }

    /// Relocates `record_id` to `destination` on behalf of `manager_id`.
    ///
    /// On success the record lives only on the destination. On any failure
    /// the local copy is left untouched; the one undetectable outcome is a
    /// lost acknowledgement, which leaves a copy on both nodes and is
    /// absorbed by the destination's idempotent push handling on retry.
    pub async fn transfer(
        &self,
        manager_id: &str,
        record_id: RecordId,
        destination: &NodeName,
    ) -> Result<()> {
        if destination == self.directory.local_name() {
            bail!("record {} already lives on {}", record_id, destination);
        }
        let Some(peer) = self.directory.get(destination) else {
            bail!("unknown destination node {}", destination);
        };
        let Some(locked) = self.store.lock_record(record_id).await else {
            bail!("record {} not found on this node", record_id);
        };

        // The shard stays locked across the round trip; edits wait until
        // the record's fate is settled.
        let frame = ControlRequest::push_frame(manager_id, locked.record());
        let reply = self.client.exchange(&peer.control_target(), &frame).await?;
        if reply != record_id.to_string() {
            bail!(
                "destination {} rejected record {} (reply {:?})",
                destination,
                record_id,
                reply
            );
        }

        self.store.remove_locked(locked);
        tracing::debug!("Record {} handed over to {}", record_id, destination);
        Ok(())
    }
}
