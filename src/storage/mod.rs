//! Record sources: the SQLite `cron_schedule` table and JSON exports of it.

pub mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use r2d2::Pool as R2D2Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::timeline::JobRunRecord;

/// Connection Pool type
pub type Pool = R2D2Pool<SqliteConnectionManager>;

/// Open (or create) the SQLite database and return a connection pool.
pub fn open_pool(path: &str) -> Result<Pool> {
    let manager = SqliteConnectionManager::file(path).with_init(|c| {
        c.execute_batch(
            "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
        )
    });

    let pool = R2D2Pool::new(manager)?;

    // Run migrations on a single connection
    let conn = pool.get()?;
    schema::migrate(&conn)?;

    Ok(pool)
}

/// Load runs ordered by scheduled time, newest `limit` if given.
pub fn load_records(pool: &Pool, limit: Option<usize>) -> Result<Vec<JobRunRecord>> {
    let conn = pool.get()?;
    let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

    let mut stmt = conn.prepare(
        "SELECT schedule_id, job_code, status, messages, scheduled_at, executed_at, finished_at
         FROM (
             SELECT * FROM cron_schedule
             ORDER BY scheduled_at DESC, schedule_id DESC
             LIMIT ?1
         )
         ORDER BY scheduled_at ASC, schedule_id ASC",
    )?;

    let rows = stmt.query_map([limit], |row| {
        Ok(JobRunRecord {
            schedule_id: row.get(0)?,
            job_code: row.get(1)?,
            status: row.get(2)?,
            messages: row.get(3)?,
            scheduled_at: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            executed_at: row.get(5)?,
            finished_at: row.get(6)?,
        })
    })?;

    let mut records = Vec::new();
    for r in rows {
        records.push(r?);
    }
    info!(count = records.len(), "loaded job runs from database");
    Ok(records)
}

/// Insert one run, returning its `schedule_id`.
pub fn insert_record(pool: &Pool, record: &JobRunRecord) -> Result<i64> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO cron_schedule
             (schedule_id, job_code, status, messages, scheduled_at, executed_at, finished_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            record.schedule_id,
            record.job_code,
            record.status,
            record.messages,
            record.scheduled_at,
            record.executed_at,
            record.finished_at,
        ],
    )
    .context("Failed to insert job run")?;

    Ok(conn.last_insert_rowid())
}

/// Read a JSON array of runs.
pub fn load_json(path: &Path) -> Result<Vec<JobRunRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records file: {}", path.display()))?;
    let records: Vec<JobRunRecord> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse records file: {}", path.display()))?;
    info!(path = %path.display(), count = records.len(), "loaded job runs from file");
    Ok(records)
}
