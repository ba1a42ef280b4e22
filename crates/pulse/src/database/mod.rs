/// libsql-backed ledger
///
/// The schema is versioned through `schema_migrations`; outcomes from every
/// monitor sharing the file live in one `outcomes` table, scoped by monitor
/// name.
pub mod migrations;
pub mod repository;

pub use repository::LibsqlLedger;

use crate::error::Result;

/// Initialize database with schema
pub async fn initialize_database(conn: &libsql::Connection) -> Result<()> {
    migrations::run_migrations(conn).await
}
