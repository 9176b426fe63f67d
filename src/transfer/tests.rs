//! Transfer Module Tests
//!
//! Drives real push-then-delete round trips between two stores over
//! loopback UDP, plus the failure paths that must leave the source copy
//! untouched.

#[cfg(test)]
mod tests {
    use crate::control::client::ControlClient;
    use crate::control::listener::ControlListener;
    use crate::directory::types::{NodeDirectory, NodeEntry, NodeName};
    use crate::records::store::{EditOutcome, RecordStore};
    use crate::records::types::{Record, RecordId, RecordKind, StudentRecord, TeacherRecord};
    use crate::transfer::coordinator::TransferCoordinator;
    use std::sync::Arc;
    use std::time::Duration;

    fn member(name: &str, control_port: u16) -> NodeEntry {
        NodeEntry {
            name: NodeName::from(name),
            host: "127.0.0.1".to_string(),
            client_port: 0,
            control_port,
        }
    }

    fn teacher_record(sequence: u32) -> Record {
        Record::Teacher(TeacherRecord {
            id: RecordId::new(RecordKind::Teacher, sequence),
            first_name: "Anna".to_string(),
            last_name: "Doe".to_string(),
            address: "12 Main St".to_string(),
            phone: "514-555-0101".to_string(),
            specialization: "french".to_string(),
            location: "mtl".to_string(),
        })
    }

    fn student_record(sequence: u32) -> Record {
        Record::Student(StudentRecord {
            id: RecordId::new(RecordKind::Student, sequence),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            courses_registered: "CS101".to_string(),
            status: "active".to_string(),
            status_date: 1_700_000_000_000,
        })
    }

    /// Source coordinator wired to a live destination listener.
    async fn two_node_setup() -> (Arc<RecordStore>, Arc<RecordStore>, TransferCoordinator) {
        let source_store = Arc::new(RecordStore::new());
        let dest_store = Arc::new(RecordStore::new());

        let dest_listener = ControlListener::bind(
            "127.0.0.1:0".parse().unwrap(),
            NodeName::from("LVL"),
            dest_store.clone(),
        )
        .await
        .unwrap();
        let dest_port = dest_listener.local_addr().unwrap().port();
        dest_listener.start().await;

        let directory = Arc::new(
            NodeDirectory::new(
                NodeName::from("MTL"),
                vec![member("MTL", 0), member("LVL", dest_port)],
            )
            .unwrap(),
        );
        let coordinator =
            TransferCoordinator::new(source_store.clone(), directory, ControlClient::new());

        (source_store, dest_store, coordinator)
    }

    // ============================================================
    // SUCCESSFUL HANDOVER
    // ============================================================

    #[tokio::test]
    async fn test_transfer_moves_the_record() {
        let (source, dest, coordinator) = two_node_setup().await;
        let record = teacher_record(0);
        let id = record.id();
        source.insert(record.clone()).await;

        coordinator.transfer("mgr1001", id, &NodeName::from("LVL")).await.unwrap();

        assert_eq!(source.count(), 0);
        assert!(source.find_by_id(id).await.is_none());
        assert_eq!(dest.count(), 1);
        assert_eq!(dest.find_by_id(id).await, Some(record));
    }

    #[tokio::test]
    async fn test_transferred_student_keeps_its_status_date() {
        let (source, dest, coordinator) = two_node_setup().await;
        let record = student_record(1);
        let id = record.id();
        source.insert(record.clone()).await;

        coordinator.transfer("mgr1001", id, &NodeName::from("LVL")).await.unwrap();

        match dest.find_by_id(id).await {
            Some(Record::Student(student)) => {
                assert_eq!(student.status_date, 1_700_000_000_000);
            }
            other => panic!("Expected the student on the destination, got {:?}", other),
        }
    }

    // ============================================================
    // REJECTED TRANSFERS (record must stay put)
    // ============================================================

    #[tokio::test]
    async fn test_transfer_to_own_node_is_rejected() {
        let (source, dest, coordinator) = two_node_setup().await;
        let record = teacher_record(0);
        let id = record.id();
        source.insert(record).await;

        let result = coordinator.transfer("mgr1001", id, &NodeName::from("MTL")).await;

        assert!(result.is_err());
        assert_eq!(source.count(), 1);
        assert_eq!(dest.count(), 0);
    }

    #[tokio::test]
    async fn test_transfer_to_unknown_node_is_rejected() {
        let (source, _, coordinator) = two_node_setup().await;
        let record = teacher_record(0);
        let id = record.id();
        source.insert(record).await;

        let result = coordinator.transfer("mgr1001", id, &NodeName::from("YUL")).await;

        assert!(result.is_err());
        assert_eq!(source.count(), 1);
    }

    #[tokio::test]
    async fn test_transfer_of_missing_record_is_rejected() {
        let (_, _, coordinator) = two_node_setup().await;
        let result = coordinator
            .transfer("mgr1001", RecordId::new(RecordKind::Teacher, 9), &NodeName::from("LVL"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_destination_leaves_the_record_usable() {
        // The destination entry points at a socket that never answers.
        let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let silent_port = silent.local_addr().unwrap().port();

        let source = Arc::new(RecordStore::new());
        let directory = Arc::new(
            NodeDirectory::new(
                NodeName::from("MTL"),
                vec![member("MTL", 0), member("LVL", silent_port)],
            )
            .unwrap(),
        );
        let coordinator = TransferCoordinator::new(
            source.clone(),
            directory,
            ControlClient::with_policy(Duration::from_millis(50), 2),
        );

        let record = teacher_record(0);
        let id = record.id();
        source.insert(record).await;

        let result = coordinator.transfer("mgr1001", id, &NodeName::from("LVL")).await;

        assert!(result.is_err());
        assert_eq!(source.count(), 1);
        // The shard lock was released on failure, so edits go through again.
        assert_eq!(source.edit(id, "phone", "514-555-0199").await, EditOutcome::Applied);
    }
}
