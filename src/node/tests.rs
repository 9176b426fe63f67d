//! Node Service Tests
//!
//! Exercises the manager-facing operations end to end against real stores,
//! with live control listeners where an operation fans out to peers.

#[cfg(test)]
mod tests {
    use crate::control::client::ControlClient;
    use crate::control::listener::ControlListener;
    use crate::directory::types::{NodeDirectory, NodeEntry, NodeName};
    use crate::node::handlers::router;
    use crate::node::protocol::{
        AckResponse, CountResponse, CreateRecordResponse, ENDPOINT_CREATE_STUDENT,
        ENDPOINT_CREATE_TEACHER, ENDPOINT_EDIT_RECORD, ENDPOINT_RECORD_COUNT,
        ENDPOINT_TRANSFER_RECORD, KindResponse,
    };
    use crate::node::service::NodeService;
    use crate::records::store::RecordStore;
    use crate::records::types::{Record, RecordId, RecordKind, StudentRecord, now_ms};
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

    fn single_node() -> (Arc<RecordStore>, Arc<NodeService>) {
        let store = Arc::new(RecordStore::new());
        let directory = Arc::new(
            NodeDirectory::new(NodeName::from("MTL"), vec![member("MTL", 0)]).unwrap(),
        );
        let service = NodeService::new(directory, store.clone(), ControlClient::new());
        (store, service)
    }

    async fn bind_listener(name: &str, store: Arc<RecordStore>) -> u16 {
        let listener = ControlListener::bind(
            "127.0.0.1:0".parse().unwrap(),
            NodeName::from(name),
            store,
        )
        .await
        .unwrap();
        let port = listener.local_addr().unwrap().port();
        listener.start().await;
        port
    }

    // ============================================================
    // RECORD CREATION
    // ============================================================

    #[tokio::test]
    async fn test_create_draws_both_kinds_from_one_sequence() {
        let (store, service) = single_node();

        let teacher_id = service
            .create_teacher_record("mgr1001", "Anna", "Doe", "12 Main St", "514-555-0101", "french", "mtl")
            .await
            .unwrap();
        let student_id = service
            .create_student_record("mgr1001", "Jane", "Smith", "CS101", "active")
            .await
            .unwrap();

        assert_eq!(teacher_id.to_string(), "TR00000");
        assert_eq!(student_id.to_string(), "SR00001");
        assert_eq!(store.count(), 2);
    }

    #[tokio::test]
    async fn test_create_uses_the_node_ordinal_in_a_federation() {
        // Sorted member order is DDO, LVL, MTL, so MTL strides 2, 5, 8...
        let store = Arc::new(RecordStore::new());
        let directory = Arc::new(
            NodeDirectory::new(
                NodeName::from("MTL"),
                vec![member("MTL", 0), member("LVL", 0), member("DDO", 0)],
            )
            .unwrap(),
        );
        let service = NodeService::new(directory, store, ControlClient::new());

        let first = service
            .create_student_record("mgr1001", "Jane", "Doe", "CS101", "active")
            .await
            .unwrap();
        let second = service
            .create_student_record("mgr1001", "John", "Roe", "CS102", "active")
            .await
            .unwrap();

        assert_eq!(first.to_string(), "SR00002");
        assert_eq!(second.to_string(), "SR00005");
    }

    #[tokio::test]
    async fn test_create_rejects_an_empty_last_name() {
        let (store, service) = single_node();

        let teacher = service
            .create_teacher_record("mgr1001", "Anna", "", "12 Main St", "514-555-0101", "french", "mtl")
            .await;
        let student = service
            .create_student_record("mgr1001", "Jane", "", "CS101", "active")
            .await;

        assert!(teacher.is_err());
        assert!(student.is_err());
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_created_student_gets_a_fresh_status_date() {
        let (store, service) = single_node();

        let before = now_ms();
        let id = service
            .create_student_record("mgr1001", "Jane", "Doe", "CS101", "active")
            .await
            .unwrap();

        match store.find_by_id(id).await {
            Some(Record::Student(student)) => assert!(
                student.status_date >= before,
                "Status date {} should be stamped at creation",
                student.status_date
            ),
            other => panic!("Expected the created student, got {:?}", other),
        }
    }

    // ============================================================
    // EDITS AND LOOKUPS
    // ============================================================

    #[tokio::test]
    async fn test_edit_record_collapses_failures_to_false() {
        let (_, service) = single_node();
        let id = service
            .create_teacher_record("mgr1001", "Anna", "Doe", "12 Main St", "514-555-0101", "french", "mtl")
            .await
            .unwrap()
            .to_string();

        assert!(service.edit_record("mgr1001", &id, "phone", "514-555-0199").await);
        assert!(!service.edit_record("mgr1001", &id, "last_name", "Smith").await);
        assert!(!service.edit_record("mgr1001", "TR99999", "phone", "x").await);
        assert!(!service.edit_record("mgr1001", "bogus", "phone", "x").await);
    }

    #[tokio::test]
    async fn test_record_kind_lookup() {
        let (_, service) = single_node();
        assert_eq!(service.record_kind("TR00042"), "TEACHER");
        assert_eq!(service.record_kind("SR00042"), "STUDENT");
        assert_eq!(service.record_kind("TR0042"), "");
        assert_eq!(service.record_kind(""), "");
    }

    #[tokio::test]
    async fn test_print_record() {
        let (_, service) = single_node();
        let id = service
            .create_student_record("mgr1001", "Jane", "Doe", "CS101", "active")
            .await
            .unwrap()
            .to_string();

        let line = service.print_record("mgr1001", &id).await;
        assert!(line.contains("Jane"));
        assert!(line.contains("Doe"));
        assert!(line.contains("CS101"));
        assert!(line.contains("active"));

        assert_eq!(service.print_record("mgr1001", "SR99999").await, "");
        assert_eq!(service.print_record("mgr1001", "not-an-id").await, "");
    }

    #[tokio::test]
    async fn test_print_all_on_an_empty_node() {
        let (_, service) = single_node();
        assert_eq!(service.print_all_records().await, "");
    }

    // ============================================================
    // FEDERATION-WIDE COUNTS
    // ============================================================

    #[tokio::test]
    async fn test_count_report_spans_the_federation() {
        let mtl_store = Arc::new(RecordStore::new());
        let lvl_store = Arc::new(RecordStore::new());
        let lvl_port = bind_listener("LVL", lvl_store.clone()).await;

        let directory = Arc::new(
            NodeDirectory::new(
                NodeName::from("MTL"),
                vec![member("MTL", 0), member("LVL", lvl_port)],
            )
            .unwrap(),
        );
        let service = NodeService::new(directory, mtl_store, ControlClient::new());

        service
            .create_teacher_record("mgr1001", "Anna", "Doe", "12 Main St", "514-555-0101", "french", "mtl")
            .await
            .unwrap();
        service
            .create_student_record("mgr1001", "Jane", "Smith", "CS101", "active")
            .await
            .unwrap();
        lvl_store
            .insert(Record::Student(StudentRecord {
                id: RecordId::new(RecordKind::Student, 1),
                first_name: "John".to_string(),
                last_name: "Roe".to_string(),
                courses_registered: "CS102".to_string(),
                status: "active".to_string(),
                status_date: now_ms(),
            }))
            .await;

        let report = service.get_record_counts("mgr1001").await;
        assert_eq!(report, "MTL 2, LVL 1");
    }

    #[tokio::test]
    async fn test_count_report_skips_unreachable_peers() {
        // LVL's port is bound but nothing ever answers on it.
        let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let silent_port = silent.local_addr().unwrap().port();

        let store = Arc::new(RecordStore::new());
        let directory = Arc::new(
            NodeDirectory::new(
                NodeName::from("MTL"),
                vec![member("MTL", 0), member("LVL", silent_port)],
            )
            .unwrap(),
        );
        let service = NodeService::new(
            directory,
            store,
            ControlClient::with_policy(Duration::from_millis(50), 1),
        );

        let report = service.get_record_counts("mgr1001").await;
        assert_eq!(report, "MTL 0", "The local entry must survive peer failures");
    }

    // ============================================================
    // TRANSFERS THROUGH THE SERVICE
    // ============================================================

    #[tokio::test]
    async fn test_transfer_to_own_node_reports_failure() {
        let (store, service) = single_node();
        let id = service
            .create_teacher_record("mgr1001", "Anna", "Doe", "12 Main St", "514-555-0101", "french", "mtl")
            .await
            .unwrap()
            .to_string();

        assert!(!service.transfer_record("mgr1001", &id, "MTL").await);
        assert!(!service.transfer_record("mgr1001", "bogus", "MTL").await);
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_transfer_between_live_nodes() {
        let mtl_store = Arc::new(RecordStore::new());
        let lvl_store = Arc::new(RecordStore::new());
        let lvl_port = bind_listener("LVL", lvl_store.clone()).await;

        let directory = Arc::new(
            NodeDirectory::new(
                NodeName::from("MTL"),
                vec![member("MTL", 0), member("LVL", lvl_port)],
            )
            .unwrap(),
        );
        let service = NodeService::new(directory, mtl_store.clone(), ControlClient::new());

        let id = service
            .create_student_record("mgr1001", "Jane", "Doe", "CS101", "active")
            .await
            .unwrap();

        assert!(service.transfer_record("mgr1001", &id.to_string(), "LVL").await);
        assert_eq!(mtl_store.count(), 0);
        assert_eq!(lvl_store.count(), 1);
        assert!(lvl_store.find_by_id(id).await.is_some());
    }

    // ============================================================
    // HTTP SURFACE TESTS (real server)
    // ============================================================

    async fn spawn_http_node() -> String {
        let store = Arc::new(RecordStore::new());
        let directory = Arc::new(
            NodeDirectory::new(NodeName::from("MTL"), vec![member("MTL", 0)]).unwrap(),
        );
        let service = NodeService::new(directory, store, ControlClient::new());
        let app = router(service);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        base
    }

    #[tokio::test]
    async fn test_http_create_edit_and_print() {
        let base = spawn_http_node().await;
        let client = reqwest::Client::new();

        let created: CreateRecordResponse = client
            .post(format!("{}{}", base, ENDPOINT_CREATE_STUDENT))
            .json(&serde_json::json!({
                "manager_id": "mgr1001",
                "first_name": "Jane",
                "last_name": "Doe",
                "courses_registered": "CS101",
                "status": "active",
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = created.record_id.unwrap();
        assert!(id.starts_with("SR"));

        let ack: AckResponse = client
            .post(format!("{}{}", base, ENDPOINT_EDIT_RECORD))
            .json(&serde_json::json!({
                "manager_id": "mgr1001",
                "record_id": id.clone(),
                "field_name": "status",
                "new_value": "inactive",
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(ack.success);

        let listing = client
            .get(format!("{}/records/{}", base, id))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(listing.contains("Jane"));
        assert!(listing.contains("inactive"));
    }

    #[tokio::test]
    async fn test_http_rejects_an_invalid_create() {
        let base = spawn_http_node().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}{}", base, ENDPOINT_CREATE_TEACHER))
            .json(&serde_json::json!({
                "manager_id": "mgr1001",
                "first_name": "Anna",
                "last_name": "",
                "address": "12 Main St",
                "phone": "514-555-0101",
                "specialization": "french",
                "location": "mtl",
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: CreateRecordResponse = response.json().await.unwrap();
        assert!(body.record_id.is_none());
    }

    #[tokio::test]
    async fn test_http_count_kind_and_transfer() {
        let base = spawn_http_node().await;
        let client = reqwest::Client::new();

        let created: CreateRecordResponse = client
            .post(format!("{}{}", base, ENDPOINT_CREATE_TEACHER))
            .json(&serde_json::json!({
                "manager_id": "mgr1001",
                "first_name": "Anna",
                "last_name": "Doe",
                "address": "12 Main St",
                "phone": "514-555-0101",
                "specialization": "french",
                "location": "mtl",
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = created.record_id.unwrap();

        let counts: CountResponse = client
            .get(format!("{}{}?manager=mgr1001", base, ENDPOINT_RECORD_COUNT))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(counts.report, "MTL 1");

        // Kind lookup is purely syntactic; the record does not have to exist.
        let kind: KindResponse = client
            .get(format!("{}/records/kind/SR00042", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(kind.kind, "STUDENT");

        let kind: KindResponse = client
            .get(format!("{}/records/kind/zzz", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(kind.kind, "");

        // A single-member federation has nowhere to transfer to.
        let ack: AckResponse = client
            .post(format!("{}{}", base, ENDPOINT_TRANSFER_RECORD))
            .json(&serde_json::json!({
                "manager_id": "mgr1001",
                "record_id": id,
                "destination": "LVL",
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(!ack.success);
    }
}
