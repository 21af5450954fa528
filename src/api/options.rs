/// Options for comparing two databases or saved snapshots.
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// First side: connection URL, or path to a saved snapshot file
    pub target_a: String,
    /// Second side: connection URL, or path to a saved snapshot file
    pub target_b: String,
    /// Schemas to restrict the comparison to (empty: all non-system
    /// schemas present on either side)
    pub schemas: Vec<String>,
    /// Exclude partition children from the comparison
    pub ignore_partitions: bool,
}

impl CompareOptions {
    /// Create new compare options with required fields.
    pub fn new(target_a: impl Into<String>, target_b: impl Into<String>) -> Self {
        Self {
            target_a: target_a.into(),
            target_b: target_b.into(),
            ..Default::default()
        }
    }

    /// Restrict the comparison to the given schemas.
    pub fn with_schemas(mut self, schemas: Vec<String>) -> Self {
        self.schemas = schemas;
        self
    }

    /// Exclude partition children (disabled by default).
    pub fn ignore_partitions(mut self) -> Self {
        self.ignore_partitions = true;
        self
    }
}

/// Options for capturing a snapshot to a file.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Connection URL of the database to capture
    pub database_url: String,
    /// Output path for the snapshot file
    pub output_path: String,
    /// Schemas to capture (empty: all non-system schemas)
    pub schemas: Vec<String>,
    /// Exclude partition children from the capture
    pub ignore_partitions: bool,
}

impl SaveOptions {
    /// Create new save options with required fields.
    pub fn new(database_url: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    /// Restrict the capture to the given schemas.
    pub fn with_schemas(mut self, schemas: Vec<String>) -> Self {
        self.schemas = schemas;
        self
    }

    /// Exclude partition children (disabled by default).
    pub fn ignore_partitions(mut self) -> Self {
        self.ignore_partitions = true;
        self
    }
}
