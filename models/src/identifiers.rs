// models/src/identifiers.rs

use uuid::Uuid;

/// Default jurisdiction code prefixed to human-readable patient ids.
pub const DEFAULT_JURISDICTION_CODE: &str = "KL";
/// Default number of digits in the zero-padded patient sequence.
pub const DEFAULT_PATIENT_ID_WIDTH: usize = 6;

/// Generates a fresh opaque record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Formats the staff-facing patient identifier, e.g. `KL000042` for the 42nd patient.
///
/// Sequences wider than `width` are rendered in full rather than truncated.
pub fn format_patient_id(jurisdiction_code: &str, width: usize, sequence: u64) -> String {
    format!("{}{:0width$}", jurisdiction_code, sequence, width = width)
}
