//! Control-Plane Wire Protocol
//!
//! Text codec for inter-node datagrams. A frame is a single pipe-delimited
//! UTF-8 line: the verb, then the verb's fields in a fixed order. Replies
//! are a bare decimal count, an echoed record identifier, or
//! [`RESPONSE_FAILURE`].
//!
//! Field values must not contain the delimiter; the framing has no escape.

use anyhow::{Result, anyhow, bail};

use crate::records::types::{Record, RecordId, RecordKind, StudentRecord, TeacherRecord};

/// Field separator within a control frame.
pub const DELIMITER: char = '|';

/// Verb asking a node for its current record count.
pub const VERB_GET_COUNT: &str = "GET_COUNT";

/// Verb handing a teacher record over to the receiving node.
pub const VERB_PUSH_TEACHER: &str = "PUSH_TEACHER";

/// Verb handing a student record over to the receiving node.
pub const VERB_PUSH_STUDENT: &str = "PUSH_STUDENT";

/// Reply sent when a frame cannot be parsed or applied.
pub const RESPONSE_FAILURE: &str = "-1";

/// A decoded inbound control request.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlRequest {
    /// Count query, answered with the node's running record count.
    GetCount,
    /// Record push initiated by `manager_id` on the sending node. The record
    /// arrives complete, keeping the identifier its home node allocated.
    Push { manager_id: String, record: Record },
}

impl ControlRequest {
    /// Encodes a count query frame.
    pub fn get_count_frame() -> String {
        VERB_GET_COUNT.to_string()
    }

    /// Encodes a push of `record` on behalf of `manager_id`. Teacher pushes
    /// carry all six data fields; student pushes carry the status date in
    /// epoch milliseconds so the receiving copy keeps its history.
    pub fn push_frame(manager_id: &str, record: &Record) -> String {
        match record {
            Record::Teacher(teacher) => {
                let id = teacher.id.to_string();
                encode(&[
                    VERB_PUSH_TEACHER,
                    manager_id,
                    &id,
                    &teacher.first_name,
                    &teacher.last_name,
                    &teacher.address,
                    &teacher.phone,
                    &teacher.specialization,
                    &teacher.location,
                ])
            }
            Record::Student(student) => {
                let id = student.id.to_string();
                let status_date = student.status_date.to_string();
                encode(&[
                    VERB_PUSH_STUDENT,
                    manager_id,
                    &id,
                    &student.first_name,
                    &student.last_name,
                    &student.courses_registered,
                    &student.status,
                    &status_date,
                ])
            }
        }
    }

    /// Decodes one inbound frame. Unknown verbs, wrong field counts and
    /// invalid identifiers are all errors; the listener answers every one of
    /// them with [`RESPONSE_FAILURE`].
    pub fn parse(raw: &str) -> Result<ControlRequest> {
        let frame = raw.trim();
        let parts: Vec<&str> = frame.split(DELIMITER).collect();

        match parts.as_slice() {
            [VERB_GET_COUNT] => Ok(ControlRequest::GetCount),

            [
                VERB_PUSH_TEACHER,
                manager_id,
                id,
                first_name,
                last_name,
                address,
                phone,
                specialization,
                location,
            ] => {
                let id = parse_id(id, RecordKind::Teacher)?;
                Ok(ControlRequest::Push {
                    manager_id: manager_id.to_string(),
                    record: Record::Teacher(TeacherRecord {
                        id,
                        first_name: first_name.to_string(),
                        last_name: last_name.to_string(),
                        address: address.to_string(),
                        phone: phone.to_string(),
                        specialization: specialization.to_string(),
                        location: location.to_string(),
                    }),
                })
            }

            [
                VERB_PUSH_STUDENT,
                manager_id,
                id,
                first_name,
                last_name,
                courses_registered,
                status,
                status_date,
            ] => {
                let id = parse_id(id, RecordKind::Student)?;
                let status_date: u64 = status_date
                    .parse()
                    .map_err(|_| anyhow!("bad status date {:?} in push frame", status_date))?;
                Ok(ControlRequest::Push {
                    manager_id: manager_id.to_string(),
                    record: Record::Student(StudentRecord {
                        id,
                        first_name: first_name.to_string(),
                        last_name: last_name.to_string(),
                        courses_registered: courses_registered.to_string(),
                        status: status.to_string(),
                        status_date,
                    }),
                })
            }

            _ => bail!("malformed control frame {:?}", frame),
        }
    }
}

fn encode(parts: &[&str]) -> String {
    parts.join(&DELIMITER.to_string())
}

fn parse_id(text: &str, expected: RecordKind) -> Result<RecordId> {
    let id = RecordId::parse(text).ok_or_else(|| anyhow!("bad record id {:?}", text))?;
    if id.kind() != expected {
        bail!("record id {} does not belong in a {} push", id, expected.as_str());
    }
    Ok(id)
}
