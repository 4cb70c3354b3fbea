//! Connection bootstrap for the finance database.
//!
//! # Invariants
//! - Returned connections have every migration applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const MEMORY_LOCATION: &str = ":memory:";

/// Opens (creating if needed) the finance database file at `path`.
///
/// Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", &path.display().to_string(), || Connection::open(path))
}

/// Opens a throwaway in-memory database that lives as long as the
/// returned connection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", MEMORY_LOCATION, Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    location: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = prepare(location, connect);

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn prepare(
    location: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let open_failed = |source| DbError::Open {
        location: location.to_string(),
        source,
    };

    let mut conn = connect().map_err(open_failed)?;
    conn.busy_timeout(Duration::from_secs(5))
        .map_err(open_failed)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}
