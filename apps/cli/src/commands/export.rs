//! # Export Command
//!
//! Writes every product (store order, not the filtered view) as CSV or as
//! tab-delimited text.
//!
//! ```text
//! shelfbook export csv                   → stdout
//! shelfbook export csv -o -              → stdout
//! shelfbook export csv -o ./out/         → ./out/inventory.csv
//! shelfbook export text -o report.txt    → report.txt
//! ```

use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

use shelfbook_store::Ledger;

use super::Output;
use crate::cli::{ExportArgs, ExportFormat};
use crate::error::ApiResult;

/// `shelfbook export csv|text`
pub async fn export(ledger: &Ledger, args: ExportArgs) -> ApiResult<Output> {
    let content = match args.format {
        ExportFormat::Csv => ledger.export_csv().await?,
        ExportFormat::Text => ledger.export_text().await?,
    };
    let count = ledger.products().await.len();
    let format = format_name(args.format);

    let Some(target) = args.output.filter(|p| p.as_os_str() != "-") else {
        return Ok(Output::new(
            content.clone(),
            json!({ "format": format, "products": count, "content": content }),
        ));
    };

    let path = resolve_target(&target, args.format);
    std::fs::write(&path, &content)?;
    info!(path = %path.display(), format, products = count, "Inventory exported");

    Ok(Output::new(
        format!("Exported {} products to {}", count, path.display()),
        json!({
            "format": format,
            "products": count,
            "path": path,
            "bytes": content.len(),
        }),
    ))
}

/// A directory target gets the default file name for the format.
fn resolve_target(target: &Path, format: ExportFormat) -> PathBuf {
    if target.is_dir() {
        target.join(format.default_file_name())
    } else {
        target.to_path_buf()
    }
}

fn format_name(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Text => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{form, ledger};
    use shelfbook_core::export::EXPORT_HEADER;

    #[tokio::test]
    async fn test_csv_to_stdout() {
        let ledger = ledger().await;
        ledger.add_product(&form("Rice", "1000", "4", "Grains")).await.unwrap();

        let args = ExportArgs {
            format: ExportFormat::Csv,
            output: None,
        };
        let out = export(&ledger, args).await.unwrap();

        let mut lines = out.text.lines();
        assert_eq!(lines.next(), Some(EXPORT_HEADER.join(",").as_str()));
        assert_eq!(lines.next(), Some("Rice,Grains,,,,,,1000,75,1075,4,4300"));
        assert_eq!(out.json["products"], 1);
    }

    #[tokio::test]
    async fn test_text_into_directory() {
        let ledger = ledger().await;
        ledger.add_product(&form("Rice", "1000", "4", "Grains")).await.unwrap();
        let dir = tempfile::tempdir().unwrap();

        let args = ExportArgs {
            format: ExportFormat::Text,
            output: Some(dir.path().to_path_buf()),
        };
        let out = export(&ledger, args).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("inventory.txt")).unwrap();
        assert!(written.contains("Rice\tGrains"));
        assert!(written.contains("₦1075"));
        assert_eq!(out.json["bytes"], written.len());
        assert!(out.text.starts_with("Exported 1 products to "));
    }

    #[tokio::test]
    async fn test_dash_means_stdout() {
        let ledger = ledger().await;
        let args = ExportArgs {
            format: ExportFormat::Csv,
            output: Some(PathBuf::from("-")),
        };
        let out = export(&ledger, args).await.unwrap();
        assert_eq!(out.text.trim_end(), EXPORT_HEADER.join(","));
    }
}
