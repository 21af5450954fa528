use crate::util::{sanitize_url, CompareError, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub struct PgConnection {
    pool: Pool<Postgres>,
    label: String,
}

impl PgConnection {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let label = sanitize_url(connection_string);
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await
            .map_err(|e| CompareError::Database(format!("Failed to connect to {label}: {e}")))?;

        Ok(PgConnection { pool, label })
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    /// Sanitized connection identity, used as the snapshot label.
    pub fn label(&self) -> &str {
        &self.label
    }
}
