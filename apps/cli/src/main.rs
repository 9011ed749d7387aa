//! `shelfbook` binary entry point.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    shelfbook_cli::run().await
}
