use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cron_timeline::config::LoggingConfig;
use cron_timeline::timeline::placement::format_percent;
use cron_timeline::timeline::{
    days_to_weeks, Clock, DateFormat, Extent, FixedClock, Placement, Status, SystemClock,
};
use cron_timeline::{storage, JobRunRecord, RangeCalculator, TimelineConfig};

#[derive(Parser)]
#[command(
    name = "cron-timeline",
    about = "Timeline layout for cron job executions",
    version,
    long_about = None
)]
struct Cli {
    /// Config file (TOML). Defaults to $CRON_TIMELINE_CONFIG, then /etc/cron-timeline/timeline.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pin the current instant, written in the configured date format
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the visible range for a set of runs
    Range {
        #[command(flatten)]
        source: SourceArgs,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Show where each run sits in the range
    Layout {
        #[command(flatten)]
        source: SourceArgs,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Print the position of the "now" marker
    NowOffset {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Convert days into five-day work weeks
    Weeks {
        days: f64,
    },

    /// Copy runs from a JSON file into a SQLite database
    Import {
        /// JSON file holding an array of runs
        #[arg(long)]
        input: PathBuf,

        /// Target database
        #[arg(long)]
        db: String,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// JSON file holding an array of runs
    #[arg(long, conflicts_with = "db")]
    input: Option<PathBuf>,

    /// SQLite database with a cron_schedule table
    #[arg(long)]
    db: Option<String>,

    /// Only the N runs that start latest (scheduled_at for --db)
    #[arg(long)]
    limit: Option<usize>,
}

impl SourceArgs {
    /// Runs come back oldest first. File input is ordered by effective start,
    /// with runs lacking one first.
    fn load<C: Clock>(&self, calc: &RangeCalculator<C>) -> Result<Vec<JobRunRecord>> {
        let mut records = match (&self.input, &self.db) {
            (Some(path), _) => storage::load_json(path)?,
            (None, Some(db)) => {
                let pool = storage::open_pool(db)?;
                return storage::load_records(&pool, self.limit);
            }
            (None, None) => {
                anyhow::bail!("a record source is required (use --input <FILE> or --db <PATH>)")
            }
        };
        records.sort_by_key(|record| calc.effective_start(record));
        if let Some(limit) = self.limit {
            let skip = records.len().saturating_sub(limit);
            records.drain(..skip);
        }
        Ok(records)
    }
}

#[derive(Serialize)]
struct LayoutRow<'a> {
    schedule_id: Option<i64>,
    job_code: Option<&'a str>,
    #[serde(flatten)]
    placement: Placement,
    status: Status,
}

/// Logs emitted while the config, and with it the real logging setup, is
/// still loading.
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish()
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        match &cli.config {
            Some(path) => TimelineConfig::load(path),
            None => Ok(TimelineConfig::load_or_default()),
        }
    })?;
    init_tracing(&config.logging);

    let now = match &cli.now {
        Some(raw) => DateFormat::new(&config.date_format).parse(raw).with_context(|| {
            format!("--now '{}' does not match date format '{}'", raw, config.date_format)
        })?,
        None => SystemClock.now(),
    };
    let calc = RangeCalculator::with_clock(&config, FixedClock(now))?;

    match cli.command {
        Commands::Range { source, json } => {
            let records = source.load(&calc)?;
            let range = calc.range(&records);

            if json {
                println!("{}", serde_json::to_string_pretty(&range)?);
            } else {
                println!("First day:  {}", range.first_day);
                println!("Last day:   {}", range.last_day);
                println!(
                    "Span:       {} hours ({} weeks)",
                    range.total_span_hours,
                    days_to_weeks(range.day_count() as f64)
                );
                println!("Today:      {}", if range.contains_today { "yes" } else { "no" });
                println!("\nDays:");
                for bucket in &range.day_buckets {
                    println!("  {}", calc.format_header(*bucket));
                }
            }
        }
        Commands::Layout { source, json } => {
            let records = source.load(&calc)?;
            let range = calc.range(&records);

            for record in &records {
                if let Err(e) = calc.check_interval(record) {
                    tracing::warn!(
                        schedule_id = ?record.schedule_id,
                        job = ?record.job_code,
                        "{}",
                        e
                    );
                }
            }

            let rows: Vec<LayoutRow<'_>> = records
                .iter()
                .map(|record| {
                    let (placement, status) = calc.layout(&range, record);
                    LayoutRow {
                        schedule_id: record.schedule_id,
                        job_code: record.job_code.as_deref(),
                        placement,
                        status,
                    }
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No job runs found.");
            } else {
                println!(
                    "{:<8} | {:<32} | {:<8} | {:>10} | {:>10}",
                    "Id", "Job", "Status", "Offset h", "Length h"
                );
                println!("{:-<8}-|-{:-<32}-|-{:-<8}-|-{:->10}-|-{:->10}", "", "", "", "", "");
                for row in rows {
                    let id = row.schedule_id.map_or_else(|| "-".to_string(), |id| id.to_string());
                    let status = row.status.kind.map_or("-", |s| s.as_str());
                    let offset = row
                        .placement
                        .start_offset_hours
                        .map_or_else(|| "invalid".to_string(), |h| format!("{h:.2}"));
                    let length = match row.placement.extent {
                        Extent::Hours(h) => format!("{h:.2}"),
                        Extent::Unbounded => "open".to_string(),
                        Extent::Unplaced => "-".to_string(),
                    };
                    println!(
                        "{:<8} | {:<32} | {:<8} | {:>10} | {:>10}",
                        id,
                        row.job_code.unwrap_or("-"),
                        status,
                        offset,
                        length
                    );
                }
            }
        }
        Commands::NowOffset { source } => {
            let records = source.load(&calc)?;
            let range = calc.range(&records);
            println!("{}", format_percent(calc.now_offset_percent(&range)));
        }
        Commands::Weeks { days } => {
            println!("{}", days_to_weeks(days));
        }
        Commands::Import { input, db } => {
            let records = storage::load_json(&input)?;
            let pool = storage::open_pool(&db)?;
            for record in &records {
                storage::insert_record(&pool, record)?;
            }
            tracing::info!(count = records.len(), %db, "imported job runs");
            println!("Imported {} job runs into {}.", records.len(), db);
        }
    }

    Ok(())
}
