//! # shelfbook-cli: Command Line for the Shelfbook Ledger
//!
//! Parses one command, runs it against the ledger and prints the result.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         shelfbook (binary)                              │
//! │                                                                         │
//! │  Cli::parse() ──► init_tracing() ──► AppConfig::load()                 │
//! │                                            │                            │
//! │                       ┌────────────────────┴───────────────┐           │
//! │                       ▼                                    ▼           │
//! │            tax / login (no ledger)          SqliteStore::connect()     │
//! │                       │                     Ledger::open()             │
//! │                       │                            │                    │
//! │                       │                     commands::dispatch()       │
//! │                       ▼                            ▼                    │
//! │                 Output { text, json, exit_code } / ApiError            │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │        stdout: text or pretty JSON      stderr: logs and errors        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment
//! - `RUST_LOG` - log filter (default `warn,shelfbook=info,sqlx=warn`)
//! - `SHELFBOOK_*` - see [`config`]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use clap::Parser;
use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use shelfbook_store::{DbConfig, Ledger, SqliteStore};

use crate::cli::Cli;
use crate::commands::{Output, Prompt};
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};

/// Runs the binary: parse, execute, print, exit status.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.json;
    let mut prompt = StdinPrompt;

    match execute(cli, &mut prompt).await {
        Ok(output) => match print_output(&output, json) {
            Ok(()) => ExitCode::from(output.exit_code),
            Err(err) => report_error(&err, json),
        },
        Err(err) => report_error(&err, json),
    }
}

/// Loads config, opens the ledger when the command needs one, dispatches.
pub async fn execute(cli: Cli, prompt: &mut dyn Prompt) -> ApiResult<Output> {
    let config = AppConfig::load(cli.config.as_deref())?;

    if !cli.command.needs_ledger() {
        return commands::dispatch_standalone(cli.command, &config, prompt);
    }

    let ledger = open_ledger(&config, cli.db.as_deref()).await?;
    commands::dispatch(cli.command, &ledger, &config, prompt).await
}

/// Opens the SQLite-backed ledger named by `--db` or the config.
pub async fn open_ledger(
    config: &AppConfig,
    db_override: Option<&std::path::Path>,
) -> ApiResult<Ledger> {
    let path = config.database_path(db_override)?;
    debug!(path = %path.display(), "Opening ledger database");

    let store = SqliteStore::connect(DbConfig::new(path)).await?;
    let ledger = Ledger::open(Arc::new(store), config.ledger_settings()).await?;

    let report = ledger.load_report();
    if report.quarantined_products > 0 || report.quarantined_history > 0 {
        warn!(
            products = report.quarantined_products,
            history = report.quarantined_history,
            "Unreadable records were moved to quarantine"
        );
    }
    info!(products = report.products, history = report.history, "Ledger ready");

    Ok(ledger)
}

/// Initializes the tracing subscriber. Logs go to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,shelfbook=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_output(output: &Output, json: bool) -> ApiResult<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&output.json)?)?;
    } else if !output.text.is_empty() {
        write!(stdout, "{}", output.text)?;
        if !output.text.ends_with('\n') {
            writeln!(stdout)?;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn report_error(err: &ApiError, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string_pretty(err) {
            Ok(body) => println!("{}", body),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("{}", err);
    }
    ExitCode::from(err.code.exit_code())
}

// =============================================================================
// Terminal Prompt
// =============================================================================

/// Reads answers from stdin, questions to stderr.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        Ok(commands::is_yes(&self.ask(question)?))
    }

    fn ask(&mut self, label: &str) -> std::io::Result<String> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{}", label)?;
        stderr.flush()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::ScriptedPrompt;

    fn cli(db: &std::path::Path, config: &std::path::Path, args: &[&str]) -> Cli {
        let mut argv = vec![
            "shelfbook".to_string(),
            "--db".to_string(),
            db.display().to_string(),
            "--config".to_string(),
            config.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_execute_against_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("shop.db");
        let config = dir.path().join("shelfbook.toml");
        std::fs::write(&config, "[ledger]\ncurrency_symbol = \"₦\"\n").unwrap();
        let mut prompt = ScriptedPrompt::default();

        execute(
            cli(&db, &config, &["add", "--name", "Rice", "--cost", "1000", "--qty", "4"]),
            &mut prompt,
        )
        .await
        .unwrap();

        // Reopening the file sees the same ledger
        let out = execute(cli(&db, &config, &["dashboard"]), &mut prompt)
            .await
            .unwrap();
        assert_eq!(out.json["count"], 1);
        assert_eq!(out.json["totalValue"], 4300);
    }

    #[tokio::test]
    async fn test_tax_needs_no_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("never-created.db");
        let config = dir.path().join("shelfbook.toml");
        std::fs::write(&config, "").unwrap();
        let mut prompt = ScriptedPrompt::default();

        let out = execute(cli(&db, &config, &["tax", "2000"]), &mut prompt)
            .await
            .unwrap();
        assert_eq!(out.text, "VAT (7.5%): ₦150.00 | Total: ₦2150.00");
        assert!(!db.exists());
    }

    #[tokio::test]
    async fn test_bad_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("shelfbook.toml");
        std::fs::write(&config, "[ledger]\npage_size = 0\n").unwrap();
        let mut prompt = ScriptedPrompt::default();

        let err = execute(cli(&dir.path().join("x.db"), &config, &["list"]), &mut prompt)
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
    }
}
