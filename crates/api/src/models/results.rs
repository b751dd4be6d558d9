//! Write-outcome payloads.
//!
//! Absence is a value here: updating or deleting a missing document yields
//! zero counts rather than an error.

use serde::Serialize;

/// Outcome of a single-document insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult<Id> {
    pub inserted_id: Id,
}

/// Outcome of an update-by-ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    /// Documents matching the ID (0 or 1).
    pub matched_count: u64,
    /// Documents whose stored fields actually changed.
    pub modified_count: u64,
}

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}
