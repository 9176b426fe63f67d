//! Record Data Model
//!
//! Core types shared by the store, the control-plane codec and the client
//! API: record kinds, validated identifiers and the two record shapes.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Total length of a rendered record identifier (`TR00042`).
pub const RECORD_ID_LEN: usize = 7;

/// Digits in the numeric part of a record identifier.
const SEQUENCE_DIGITS: usize = 5;

/// The two kinds of person record a federation node manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Teacher,
    Student,
}

impl RecordKind {
    /// Two-letter tag that prefixes every identifier of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            RecordKind::Teacher => "TR",
            RecordKind::Student => "SR",
        }
    }

    /// Client-facing name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Teacher => "TEACHER",
            RecordKind::Student => "STUDENT",
        }
    }

    /// Determines the kind encoded in `record_id`, or `None` when the text
    /// is not a well-formed record identifier.
    pub fn classify(record_id: &str) -> Option<RecordKind> {
        RecordId::parse(record_id).map(|id| id.kind())
    }

    fn from_prefix(tag: &str) -> Option<RecordKind> {
        match tag {
            "TR" => Some(RecordKind::Teacher),
            "SR" => Some(RecordKind::Student),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Federation-unique record identifier: a kind tag plus a zero-padded
/// sequence number, rendered as exactly [`RECORD_ID_LEN`] characters.
///
/// Instances only exist for well-formed identifiers; anything read off the
/// wire goes through [`RecordId::parse`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    kind: RecordKind,
    sequence: u32,
}

impl RecordId {
    pub fn new(kind: RecordKind, sequence: u32) -> Self {
        Self { kind, sequence }
    }

    /// Validates and parses an identifier. Wrong length, unknown tag or a
    /// non-digit in the numeric part all yield `None`.
    pub fn parse(text: &str) -> Option<RecordId> {
        if text.len() != RECORD_ID_LEN {
            return None;
        }
        // get() instead of split_at: wire input may put a multibyte char
        // across the split point.
        let tag = text.get(..RECORD_ID_LEN - SEQUENCE_DIGITS)?;
        let digits = text.get(RECORD_ID_LEN - SEQUENCE_DIGITS..)?;
        let kind = RecordKind::from_prefix(tag)?;
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let sequence: u32 = digits.parse().ok()?;
        Some(RecordId { kind, sequence })
    }

    pub fn kind(self) -> RecordKind {
        self.kind
    }

    pub fn sequence(self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:0width$}", self.kind.prefix(), self.sequence, width = SEQUENCE_DIGITS)
    }
}

/// A teaching-staff record. Everything except the identifier and the name
/// can be edited after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherRecord {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub specialization: String,
    pub location: String,
}

/// A student record. `status_date` is derived: the status setter refreshes
/// it on every status change and nothing else may write it.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub courses_registered: String,
    pub status: String,
    pub status_date: u64,
}

/// One stored record of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Teacher(TeacherRecord),
    Student(StudentRecord),
}

impl Record {
    pub fn id(&self) -> RecordId {
        match self {
            Record::Teacher(t) => t.id,
            Record::Student(s) => s.id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.id().kind()
    }

    pub fn last_name(&self) -> &str {
        match self {
            Record::Teacher(t) => &t.last_name,
            Record::Student(s) => &s.last_name,
        }
    }

    /// Shard this record belongs to, always recomputed from the current
    /// last name.
    pub fn shard_key(&self) -> char {
        shard_key(self.last_name())
    }

    /// One-line human-readable listing used by the print operations.
    pub fn render(&self) -> String {
        match self {
            Record::Teacher(t) => format!(
                "{} {} {} address={} phone={} specialization={} location={}",
                t.id, t.first_name, t.last_name, t.address, t.phone, t.specialization, t.location
            ),
            Record::Student(s) => format!(
                "{} {} {} courses={} status={} statusDate={}",
                s.id,
                s.first_name,
                s.last_name,
                s.courses_registered,
                s.status,
                format_timestamp(s.status_date)
            ),
        }
    }
}

/// Shard key for a last name: its first letter, uppercased.
pub fn shard_key(last_name: &str) -> char {
    last_name.chars().flat_map(char::to_uppercase).next().unwrap_or('#')
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Renders an epoch-millisecond timestamp as a UTC calendar date and time.
/// Out-of-range values fall back to the raw number.
pub fn format_timestamp(ms: u64) -> String {
    match chrono::DateTime::from_timestamp_millis(ms as i64) {
        Some(when) => when.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ms.to_string(),
    }
}
