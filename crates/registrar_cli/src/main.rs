//! Operator CLI for the registrar core.
//!
//! # Responsibility
//! - Load TOML config, start file logging, open the records database.
//! - Print health, roster and dashboard output as JSON for quick checks.

use clap::{Parser, Subcommand};
use log::info;
use registrar_core::db::open_db;
use registrar_core::{
    core_version, init_logging, load_config, normalize, ping, AppConfig, AttendanceService,
    DashboardService, SqliteAttendanceRepository, SqliteStatsRepository, SqliteStudentRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "registrar")]
#[command(about = "Academic records maintenance tool")]
#[command(version)]
struct Args {
    /// TOML config file; built-in defaults when omitted
    #[arg(short, long, env = "REGISTRAR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core linkage info without touching the database
    Ping,
    /// Print the attendance roster for one class session
    Roster {
        /// `YYYY-MM-DD` or `DD-MM-YYYY`; today when omitted
        #[arg(long)]
        date: Option<String>,
        /// Department name
        #[arg(long)]
        branch: String,
        #[arg(long)]
        semester: i64,
    },
    /// Print dashboard aggregates
    Stats,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &config.logging.dir {
        init_logging(&config.logging.level, &dir.to_string_lossy())?;
    }

    match args.command {
        Command::Ping => {
            println!("registrar_core ping={}", ping());
            println!("registrar_core version={}", core_version());
        }
        Command::Roster {
            date,
            branch,
            semester,
        } => {
            let conn = open_db(&config.database.path)?;
            let service = AttendanceService::new(
                SqliteAttendanceRepository::try_new(&conn)?,
                SqliteStudentRepository::try_new(&conn)?,
            );
            let date = normalize(date.as_deref()).date();
            let roster = service.build_roster(date, &branch, semester)?;
            info!(
                "event=cli_roster module=cli status=ok entries={}",
                roster.len()
            );
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
        Command::Stats => {
            let conn = open_db(&config.database.path)?;
            let service = DashboardService::new(SqliteStatsRepository::try_new(&conn)?);
            println!("{}", serde_json::to_string_pretty(&service.stats()?)?);
        }
    }
    Ok(())
}
