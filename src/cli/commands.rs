//! CLI command implementations
//!
//! Each command loads the configuration, installs the log target and drives
//! the core through `logged`, so failures are recorded in the configured sink
//! before being returned.

use std::future::IntoFuture;
use std::io::Write;
use std::path::Path;

use crate::codec;
use crate::config::Config;
use crate::db::Database;
use crate::errors::OrmError;
use crate::observability::{logged, logged_sync, LogMode, Logger};
use crate::record::Value;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Users seeded by the demo command
const DEMO_USERS: [&str; 5] = ["Andriy", "Ivan", "Maria", "Petro", "Oksana"];
const DEMO_AGE: i64 = 20;

/// Log file named in configs written by `init` and `demo`
const STARTER_LOG_FILE: &str = "file_operations.log";

/// Main CLI entry point
///
/// Parses arguments and runs the command on a current-thread runtime.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    runtime.block_on(run_command(cli.command, &mut out))
}

/// Run the appropriate command based on CLI args
pub async fn run_command<W: Write>(cmd: Command, out: &mut W) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config, out).await,
        Command::Save {
            config,
            schema,
            set,
        } => save(&config, &schema, &set, out).await,
        Command::Query {
            config,
            schema,
            constraints,
        } => query(&config, &schema, &constraints, out).await,
        Command::Demo { config } => demo(&config, out).await,
    }
}

/// Writes a default config if none exists, then creates the backing store
pub async fn init<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    if !config_path.exists() {
        starter_config().save(config_path)?;
        writeln!(out, "wrote default config {}", config_path.display())?;
    }

    let (db, mode) = open(config_path)?;
    let created = logged("initialize", &mode, db.initialize()).await?;

    let state = if created { "created" } else { "exists" };
    writeln!(out, "{} {}", state, db.database_path().display())?;
    Ok(())
}

/// Builds a record from `field=value` text and saves it
pub async fn save<W: Write>(
    config_path: &Path,
    schema_name: &str,
    assignments: &[(String, String)],
    out: &mut W,
) -> CliResult<()> {
    let (db, mode) = open(config_path)?;

    let record = logged_sync("build_record", &mode, || {
        let mut record = db.new_record(schema_name)?;
        for (field, raw) in assignments {
            record.set_text(field, raw)?;
        }
        Ok(record)
    })?;

    let saved = logged("save", &mode, db.save(record)).await?;
    write!(out, "{}", codec::encode(&[saved]))?;
    Ok(())
}

/// Resolves an equality filter, prints the matches and writes the results file
pub async fn query<W: Write>(
    config_path: &Path,
    schema_name: &str,
    constraints: &[(String, String)],
    out: &mut W,
) -> CliResult<()> {
    let (db, mode) = open(config_path)?;

    let typed = logged_sync("filter", &mode, || {
        let schema = db.schema(schema_name)?;
        constraints
            .iter()
            .map(|(field, raw)| {
                let def = schema.field(field).ok_or_else(|| {
                    OrmError::validation(field, format!("not declared in schema '{}'", schema_name))
                })?;
                let value = def
                    .parse(raw)
                    .map_err(|reason| OrmError::validation(field, reason))?;
                Ok((field.clone(), value))
            })
            .collect::<Result<Vec<(String, Value)>, OrmError>>()
    })?;

    let spec = db.filter(schema_name, typed);
    let matches = logged("filter", &mode, spec.into_future()).await?;

    write!(out, "{}", codec::encode(&matches))?;
    writeln!(
        out,
        "{} record(s) written to {}",
        matches.len(),
        db.results_path().display()
    )?;
    Ok(())
}

/// Seeds five users aged 20, then lists every user of that age
pub async fn demo<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    if !config_path.exists() {
        starter_config().save(config_path)?;
    }
    let (db, mode) = open(config_path)?;

    logged("initialize", &mode, db.initialize()).await?;

    for username in DEMO_USERS {
        let user = logged_sync("build_record", &mode, || {
            db.new_record("User")?
                .with("username", username)?
                .with("age", DEMO_AGE)
        })?;
        logged("save", &mode, db.save(user)).await?;
    }

    let spec = db.filter("User", [("age", DEMO_AGE)]);
    let users = logged("filter", &mode, spec.into_future()).await?;

    writeln!(out, "data:")?;
    for user in &users {
        let name = user.get_str("username").map_err(CliError::from)?;
        writeln!(out, "- {}", name)?;
    }
    Ok(())
}

/// Defaults plus a log file, so console output stays free of log lines
fn starter_config() -> Config {
    Config {
        log_file: Some(STARTER_LOG_FILE.into()),
        ..Config::default()
    }
}

fn open(config_path: &Path) -> CliResult<(Database, LogMode)> {
    let config = Config::load(config_path)?;
    Logger::init(config.log_target());
    let db = Database::from_config(&config)?;
    Ok((db, config.log_mode()))
}
