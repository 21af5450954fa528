pub mod connection;
pub mod introspect;

pub use connection::PgConnection;
pub use introspect::capture_snapshot;
