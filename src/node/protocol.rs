//! Client API Protocol
//!
//! Defines the HTTP endpoints and Data Transfer Objects (DTOs) through
//! which managers operate on a node (create, edit, transfer, count,
//! print).
//!
//! Record listings are returned as plain text; everything else is JSON.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Endpoint for creating a teacher record.
pub const ENDPOINT_CREATE_TEACHER: &str = "/records/teacher";
/// Endpoint for creating a student record.
pub const ENDPOINT_CREATE_STUDENT: &str = "/records/student";
/// Endpoint for editing one field of an existing record.
pub const ENDPOINT_EDIT_RECORD: &str = "/records/edit";
/// Endpoint for transferring a record to another federation member.
pub const ENDPOINT_TRANSFER_RECORD: &str = "/records/transfer";
/// Endpoint for the federation-wide record count report.
pub const ENDPOINT_RECORD_COUNT: &str = "/records/count";
/// Endpoint listing every record held by this node, as text.
pub const ENDPOINT_RECORDS: &str = "/records";

// --- Data Transfer Objects ---

/// Request to create a teacher record on this node.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTeacherRequest {
    /// Manager the creation is attributed to.
    pub manager_id: String,
    pub first_name: String,
    /// Must be non-empty; its first letter places the record in a shard.
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub specialization: String,
    pub location: String,
}

/// Request to create a student record on this node.
///
/// The status date is not part of the request: the node stamps it with its
/// own clock at creation time.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    /// Manager the creation is attributed to.
    pub manager_id: String,
    pub first_name: String,
    /// Must be non-empty; its first letter places the record in a shard.
    pub last_name: String,
    pub courses_registered: String,
    pub status: String,
}

/// Response to a create request.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRecordResponse {
    /// Identifier of the new record, or `None` when the request was
    /// rejected.
    pub record_id: Option<String>,
}

/// Request to set one mutable field of a record.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditRecordRequest {
    pub manager_id: String,
    pub record_id: String,
    /// Field to set; must be in the record kind's editable set.
    pub field_name: String,
    pub new_value: String,
}

/// Request to move a record to another federation member.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRecordRequest {
    pub manager_id: String,
    pub record_id: String,
    /// Name of the destination node, as configured in the federation.
    pub destination: String,
}

/// Standard acknowledgment for edit and transfer operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

/// Federation-wide count report.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    /// `"MTL 5, LVL 10, DDO 3"`; unreachable members are omitted.
    pub report: String,
}

/// Kind lookup result for a record identifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct KindResponse {
    /// `"TEACHER"`, `"STUDENT"`, or empty for malformed identifiers.
    pub kind: String,
}

/// Optional manager attribution for read endpoints.
#[derive(Debug, Deserialize)]
pub struct ManagerQuery {
    pub manager: Option<String>,
}
