//! Mutable Field Registries
//!
//! Declares, per record kind, which fields the edit operation may touch and
//! how each one is written. A field name missing from its registry is not
//! editable, which is how identity fields and the derived status date stay
//! immutable without scattered checks.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::types::{StudentRecord, TeacherRecord, now_ms};

/// Setter for one mutable teacher field.
pub type TeacherFieldSetter = fn(&mut TeacherRecord, &str);

/// Setter for one mutable student field.
pub type StudentFieldSetter = fn(&mut StudentRecord, &str);

/// Editable fields of a teacher record.
pub static TEACHER_FIELDS: LazyLock<HashMap<&'static str, TeacherFieldSetter>> =
    LazyLock::new(|| {
        let mut fields: HashMap<&'static str, TeacherFieldSetter> = HashMap::new();
        fields.insert("address", |record: &mut TeacherRecord, value: &str| {
            record.address = value.to_string();
        });
        fields.insert("phone", |record: &mut TeacherRecord, value: &str| {
            record.phone = value.to_string();
        });
        fields.insert("specialization", |record: &mut TeacherRecord, value: &str| {
            record.specialization = value.to_string();
        });
        fields.insert("location", |record: &mut TeacherRecord, value: &str| {
            record.location = value.to_string();
        });
        fields
    });

/// Editable fields of a student record. The status date is absent on
/// purpose: it only moves when the status itself does.
pub static STUDENT_FIELDS: LazyLock<HashMap<&'static str, StudentFieldSetter>> =
    LazyLock::new(|| {
        let mut fields: HashMap<&'static str, StudentFieldSetter> = HashMap::new();
        fields.insert("courses_registered", |record: &mut StudentRecord, value: &str| {
            record.courses_registered = value.to_string();
        });
        fields.insert("status", |record: &mut StudentRecord, value: &str| {
            record.status = value.to_string();
            record.status_date = now_ms();
        });
        fields
    });
