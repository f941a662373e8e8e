/*!
 * Database module for persistent storage of job names.
 *
 * GlobalSight only knows jobs by name, so the name each host job was
 * submitted under is kept in SQLite until the job is archived.
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{JobRecord, JobRecordStatus};
pub use repository::Repository;
