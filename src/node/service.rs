//! Node Service Façade
//!
//! The one object managers operate through. Wires the allocator, the store,
//! the control-plane requester and the transfer coordinator together, and
//! logs every mutating operation with its manager attribution.

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::control::client::ControlClient;
use crate::control::protocol::ControlRequest;
use crate::directory::types::{NodeDirectory, NodeName};
use crate::records::allocator::RecordIdAllocator;
use crate::records::store::{EditOutcome, RecordStore};
use crate::records::types::{
    Record, RecordId, RecordKind, StudentRecord, TeacherRecord, now_ms,
};
use crate::transfer::coordinator::TransferCoordinator;

pub struct NodeService {
    directory: Arc<NodeDirectory>,
    store: Arc<RecordStore>,
    allocator: RecordIdAllocator,
    coordinator: TransferCoordinator,
    client: ControlClient,
}

impl NodeService {
    /// Assembles a node's service over its store and federation directory.
    /// The allocator is seeded from the directory so identifier sequences
    /// interleave across the federation without coordination.
    pub fn new(
        directory: Arc<NodeDirectory>,
        store: Arc<RecordStore>,
        client: ControlClient,
    ) -> Arc<Self> {
        let allocator = RecordIdAllocator::new(directory.ordinal(), directory.len() as u32);
        let coordinator =
            TransferCoordinator::new(store.clone(), directory.clone(), client.clone());

        Arc::new(Self {
            directory,
            store,
            allocator,
            coordinator,
            client,
        })
    }

    pub fn node_name(&self) -> &NodeName {
        self.directory.local_name()
    }

    /// Creates a teacher record on this node and returns its identifier.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_teacher_record(
        &self,
        manager_id: &str,
        first_name: &str,
        last_name: &str,
        address: &str,
        phone: &str,
        specialization: &str,
        location: &str,
    ) -> Result<RecordId> {
        if last_name.is_empty() {
            bail!("last name must not be empty");
        }

        let id = self.allocator.allocate(RecordKind::Teacher);
        self.store
            .insert(Record::Teacher(TeacherRecord {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                address: address.to_string(),
                phone: phone.to_string(),
                specialization: specialization.to_string(),
                location: location.to_string(),
            }))
            .await;

        tracing::info!(
            "Manager {} created teacher record {} ({} {})",
            manager_id,
            id,
            first_name,
            last_name
        );
        Ok(id)
    }

    /// Creates a student record on this node and returns its identifier.
    /// The status date is stamped with the node's clock, not taken from the
    /// caller.
    pub async fn create_student_record(
        &self,
        manager_id: &str,
        first_name: &str,
        last_name: &str,
        courses_registered: &str,
        status: &str,
    ) -> Result<RecordId> {
        if last_name.is_empty() {
            bail!("last name must not be empty");
        }

        let id = self.allocator.allocate(RecordKind::Student);
        self.store
            .insert(Record::Student(StudentRecord {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                courses_registered: courses_registered.to_string(),
                status: status.to_string(),
                status_date: now_ms(),
            }))
            .await;

        tracing::info!(
            "Manager {} created student record {} ({} {})",
            manager_id,
            id,
            first_name,
            last_name
        );
        Ok(id)
    }

    /// Sets one mutable field of a record held by this node. Returns false
    /// for a malformed identifier, a missing record or a field outside the
    /// kind's editable set; in every failure case nothing is mutated.
    pub async fn edit_record(
        &self,
        manager_id: &str,
        record_id: &str,
        field_name: &str,
        new_value: &str,
    ) -> bool {
        let Some(id) = RecordId::parse(record_id) else {
            tracing::warn!(
                "Manager {} edit rejected: malformed record id {:?}",
                manager_id,
                record_id
            );
            return false;
        };

        match self.store.edit(id, field_name, new_value).await {
            EditOutcome::Applied => {
                tracing::info!(
                    "Manager {} set {} of {} to {:?}",
                    manager_id,
                    field_name,
                    id,
                    new_value
                );
                true
            }
            EditOutcome::FieldNotEditable => {
                tracing::warn!(
                    "Manager {} cannot edit field {:?} of {}",
                    manager_id,
                    field_name,
                    id
                );
                false
            }
            EditOutcome::NotFound => {
                tracing::warn!(
                    "Manager {} edit failed: record {} is not on this node",
                    manager_id,
                    id
                );
                false
            }
        }
    }

    /// Federation-wide record count: this node's count plus one control
    /// query per peer, in name order. Peers that cannot answer are logged
    /// and left out of the report rather than failing it.
    pub async fn get_record_counts(&self, manager_id: &str) -> String {
        let mut entries = vec![format!("{} {}", self.directory.local_name(), self.store.count())];

        for peer in self.directory.peers() {
            let frame = ControlRequest::get_count_frame();
            match self.client.exchange(&peer.control_target(), &frame).await {
                Ok(reply) if reply.parse::<usize>().is_ok() => {
                    entries.push(format!("{} {}", peer.name, reply));
                }
                Ok(reply) => {
                    tracing::warn!("Peer {} answered count query with {:?}", peer.name, reply);
                }
                Err(e) => {
                    tracing::warn!("Count query to {} failed: {}", peer.name, e);
                }
            }
        }

        let report = entries.join(", ");
        tracing::info!("Manager {} read record counts: {}", manager_id, report);
        report
    }

    /// Moves a record to another federation member. Returns false when the
    /// transfer could not be carried out; the record then still lives here.
    pub async fn transfer_record(
        &self,
        manager_id: &str,
        record_id: &str,
        destination: &str,
    ) -> bool {
        let Some(id) = RecordId::parse(record_id) else {
            tracing::warn!(
                "Manager {} transfer rejected: malformed record id {:?}",
                manager_id,
                record_id
            );
            return false;
        };

        let destination = NodeName::from(destination);
        match self.coordinator.transfer(manager_id, id, &destination).await {
            Ok(()) => {
                tracing::info!(
                    "Manager {} transferred record {} to {}",
                    manager_id,
                    id,
                    destination
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Manager {} transfer of {} to {} failed: {}",
                    manager_id,
                    id,
                    destination,
                    e
                );
                false
            }
        }
    }

    /// Classifies a record identifier by its kind tag. Malformed
    /// identifiers come back as an empty string; no store lookup happens.
    pub fn record_kind(&self, record_id: &str) -> &'static str {
        match RecordKind::classify(record_id) {
            Some(kind) => kind.as_str(),
            None => "",
        }
    }

    /// Text listing of every record on this node, grouped by shard letter.
    pub async fn print_all_records(&self) -> String {
        self.store.render_all().await
    }

    /// Text listing of one record, or empty when this node does not hold
    /// it.
    pub async fn print_record(&self, manager_id: &str, record_id: &str) -> String {
        let Some(id) = RecordId::parse(record_id) else {
            return String::new();
        };
        tracing::debug!("Manager {} read record {}", manager_id, id);
        self.store.render_one(id).await.unwrap_or_default()
    }
}
