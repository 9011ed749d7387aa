//! # Commands
//!
//! One function per subcommand. Each returns an [`Output`] holding both the
//! human rendering and the `--json` value; printing is left to the caller.
//!
//! ## Command Categories
//! - `product` - add, edit, delete
//! - `view` - list, categories, dashboard, history
//! - `export` - CSV and delimited-text export
//! - `tax` - VAT calculator
//! - `auth` - demo login check
//!
//! ## Pattern
//! ```rust,ignore
//! pub async fn add(ledger: &Ledger, args: ProductArgs) -> ApiResult<Output> {
//!     let product = ledger.add_product(&args.into()).await?;
//!     Output::with_json(render(&product), &product)
//! }
//! ```

pub mod auth;
pub mod export;
pub mod product;
pub mod tax;
pub mod view;

use serde::Serialize;
use serde_json::Value;

use shelfbook_store::Ledger;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Output
// =============================================================================

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Plain rendering for a terminal.
    pub text: String,

    /// Rendering for `--json`.
    pub json: Value,

    /// Process exit status. Non-zero for soft failures like a rejected login.
    pub exit_code: u8,
}

impl Output {
    pub fn new(text: impl Into<String>, json: Value) -> Self {
        Output {
            text: text.into(),
            json,
            exit_code: 0,
        }
    }

    /// Text plus any serializable value as the JSON form.
    pub fn with_json<T: Serialize>(text: impl Into<String>, value: &T) -> ApiResult<Self> {
        Ok(Output::new(text, serde_json::to_value(value)?))
    }

    pub fn failed(mut self, exit_code: u8) -> Self {
        self.exit_code = exit_code;
        self
    }
}

// =============================================================================
// Prompt
// =============================================================================

/// Interactive questions a command may need answered.
pub trait Prompt {
    /// Yes/no question. Anything other than yes is no.
    fn confirm(&mut self, question: &str) -> std::io::Result<bool>;

    /// Free-text answer, e.g. a password.
    fn ask(&mut self, label: &str) -> std::io::Result<String>;
}

/// Parses a yes/no answer.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// =============================================================================
// Dispatch
// =============================================================================

impl Command {
    /// Whether the command reads or writes the ledger.
    pub fn needs_ledger(&self) -> bool {
        !matches!(self, Command::Tax { .. } | Command::Login(_))
    }
}

/// Runs a command that needs no ledger.
pub fn dispatch_standalone(
    command: Command,
    config: &AppConfig,
    prompt: &mut dyn Prompt,
) -> ApiResult<Output> {
    match command {
        Command::Tax { amount } => tax::quote(&amount, &config.ledger_settings()),
        Command::Login(args) => auth::login(args, &config.credentials(), prompt),
        other => Err(ApiError::internal(format!(
            "{:?} needs an open ledger",
            other
        ))),
    }
}

/// Runs any command against an open ledger.
pub async fn dispatch(
    command: Command,
    ledger: &Ledger,
    config: &AppConfig,
    prompt: &mut dyn Prompt,
) -> ApiResult<Output> {
    match command {
        Command::Add(args) => product::add(ledger, args).await,
        Command::Edit { id, changes } => product::edit(ledger, &id, changes).await,
        Command::Delete(args) => product::delete(ledger, args, prompt).await,
        Command::List(args) => view::list(ledger, args).await,
        Command::Categories => view::categories(ledger).await,
        Command::Dashboard => view::dashboard(ledger).await,
        Command::History { limit } => view::history(ledger, limit).await,
        Command::Export(args) => export::export(ledger, args).await,
        standalone => dispatch_standalone(standalone, config, prompt),
    }
}
