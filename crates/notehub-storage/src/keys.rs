//! Shared key generation for storage backends.
//!
//! Key format: `{branch_id}/{semester_id}/{subject_id}/{unit_id}/{millis}_{file_name}`
//! where whitespace and path separators in the file name become `_`.

use crate::traits::{StorageError, StorageResult};
use notehub_core::models::UnitLineage;

/// Make an uploaded file name safe to use as the last key segment.
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Generate the object key for a note file uploaded at `timestamp_ms`.
pub fn note_object_key(lineage: &UnitLineage, timestamp_ms: i64, file_name: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}_{}",
        lineage.branch_id,
        lineage.semester_id,
        lineage.subject_id,
        lineage.unit_id,
        timestamp_ms,
        sanitize_file_name(file_name)
    )
}

/// Reject keys that are empty or could escape the bucket root.
///
/// Only a whole `..` segment counts as traversal; file names such as
/// `ch1..final.pdf` are ordinary keys.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.starts_with('/') || storage_key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
