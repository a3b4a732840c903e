//! Database schema and migrations.

use anyhow::Result;
use rusqlite::Connection;

/// Run all pending migrations.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS cron_schedule (
            schedule_id INTEGER PRIMARY KEY,
            job_code TEXT,
            status TEXT,
            messages TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            scheduled_at TEXT,
            executed_at TEXT,
            finished_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_cron_schedule_job_code ON cron_schedule(job_code);
        CREATE INDEX IF NOT EXISTS idx_cron_schedule_scheduled_at_status
            ON cron_schedule(scheduled_at, status);",
    )?;

    Ok(())
}
