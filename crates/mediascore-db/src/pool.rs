//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use std::time::Duration;

use mediascore_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Connections per store; workers read concurrently, one writer at a time.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize a new database pool with the given file path.
///
/// This function will:
/// - Create the SQLite database file if it doesn't exist
/// - Switch the file to WAL journaling so readers never block the writer
/// - Set a busy timeout on every pooled connection
/// - Run pending database migrations
///
/// # Example
///
/// ```no_run
/// use mediascore_db::pool::init_pool;
///
/// let pool = init_pool("/tmp/MediaScore/movie.db").unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    init_pool_with_size(db_path, DEFAULT_POOL_SIZE)
}

/// Initialize a file-backed pool with an explicit connection limit.
pub fn init_pool_with_size(db_path: &str, max_size: u32) -> Result<DbPool> {
    // r2d2 retries failed connects until its timeout; open once up front so an
    // unopenable file fails fast.
    rusqlite::Connection::open(db_path)
        .map_err(|e| Error::database(format!("Failed to open {}: {}", db_path, e)))?;

    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
    });

    build_and_migrate(manager, max_size.max(1))
}

/// Initialize an in-memory database pool for testing.
///
/// The pool holds a single connection, since every SQLite in-memory
/// connection is its own database. The data is lost when the pool is dropped.
///
/// # Example
///
/// ```
/// use mediascore_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory();
    build_and_migrate(manager, 1)
}

fn build_and_migrate(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    // Run migrations on a connection from the pool
    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {}", e)))?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    Ok(pool)
}

/// Get a connection from the pool.
///
/// This is a convenience wrapper around `pool.get()` that converts the
/// r2d2 error into our common Error type.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_memory_pool() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn test_file_pool_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.db");
        let pool = init_pool(&path.to_string_lossy()).unwrap();
        let conn = get_conn(&pool).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        assert!(path.exists());
    }

    #[test]
    fn test_multiple_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tv.db");
        let pool = init_pool_with_size(&path.to_string_lossy(), 3).unwrap();

        let _conn1 = get_conn(&pool).unwrap();
        let _conn2 = get_conn(&pool).unwrap();
        assert!(get_conn(&pool).is_ok());
    }

    #[test]
    fn test_migrations_run_on_init() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='ratings'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("movie.db");
        assert!(init_pool(&path.to_string_lossy()).is_err());
    }
}
