use crate::diff::ChangeRecord;

/// Result of comparing two schema snapshots.
#[derive(Debug, Clone)]
pub struct CompareResult {
    /// Structural differences in deterministic order
    pub records: Vec<ChangeRecord>,
    /// Rendered diff lines, one per record
    pub lines: Vec<String>,
    /// Number of differences found
    pub count: usize,
    /// Whether the two sides are structurally identical
    pub is_identical: bool,
}

/// Result of capturing a snapshot to a file.
#[derive(Debug, Clone)]
pub struct SaveResult {
    /// Path the snapshot was written to
    pub path: String,
    /// Content fingerprint of the captured snapshot
    pub fingerprint: String,
    /// Number of objects in the snapshot
    pub object_count: usize,
}
