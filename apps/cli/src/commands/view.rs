//! # View Commands
//!
//! Read-only views: the product table, category selector, dashboard card
//! and stock history.

use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

use shelfbook_core::validation::validate_search_query;
use shelfbook_core::{CoreError, HistoryEntry, HistoryKind, Page, ProductRow, StockAlert, ViewQuery};
use shelfbook_store::Ledger;

use super::Output;
use crate::cli::ListArgs;
use crate::error::ApiResult;

const NAME_WIDTH: usize = 24;
const CATEGORY_WIDTH: usize = 12;

/// A table row plus its store-order position (what `delete --at` takes).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedRow {
    position: usize,
    #[serde(flatten)]
    row: ProductRow,
}

// =============================================================================
// list
// =============================================================================

/// `shelfbook list`
pub async fn list(ledger: &Ledger, args: ListArgs) -> ApiResult<Output> {
    let query = ViewQuery {
        filter: validate_search_query(&args.filter).map_err(CoreError::from)?,
        category: args.category.filter(|c| !c.trim().is_empty()),
        page: args.page,
    };

    let page = ledger.view(&query).await;
    let positions: HashMap<String, usize> = ledger
        .products()
        .await
        .into_iter()
        .enumerate()
        .map(|(index, product)| (product.id, index + 1))
        .collect();

    let listed = Page {
        items: page
            .items
            .into_iter()
            .map(|row| ListedRow {
                position: positions.get(&row.product.id).copied().unwrap_or_default(),
                row,
            })
            .collect(),
        page: page.page,
        page_size: page.page_size,
        total_matching: page.total_matching,
        total_pages: page.total_pages,
    };

    let text = render_table(&listed, &ledger.settings().currency_symbol);
    Output::with_json(text, &listed)
}

fn render_table(page: &Page<ListedRow>, symbol: &str) -> String {
    if page.total_matching == 0 {
        return "No products match.".to_string();
    }

    let mut out = format!(
        "{:>4}  {:<name$}  {:<cat$}  {:>5}  {:>12}  {:>14}  {:<10}  {:<8}  {}\n",
        "Pos",
        "Name",
        "Category",
        "Qty",
        "Shelf price",
        "Total value",
        "Expiry",
        "Alert",
        "Id",
        name = NAME_WIDTH,
        cat = CATEGORY_WIDTH,
    );

    for listed in &page.items {
        let product = &listed.row.product;
        let expiry = product
            .expiry_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{:>4}  {:<name$}  {:<cat$}  {:>5}  {:>12}  {:>14}  {:<10}  {:<8}  {}\n",
            listed.position,
            clip(&product.name, NAME_WIDTH),
            clip(&product.category, CATEGORY_WIDTH),
            product.quantity,
            product.shelf_price.format_with_symbol(symbol),
            product.total_value.format_with_symbol(symbol),
            expiry,
            alert_label(listed.row.alert),
            product.id,
            name = NAME_WIDTH,
            cat = CATEGORY_WIDTH,
        ));
    }

    if page.items.is_empty() {
        out.push_str("(no rows on this page)\n");
    }

    out.push_str(&format!(
        "Page {} of {} ({} matching)",
        page.page, page.total_pages, page.total_matching
    ));
    out
}

fn alert_label(alert: StockAlert) -> &'static str {
    match alert {
        StockAlert::LowStock => "LOW",
        StockAlert::ExpiringSoon => "EXPIRING",
        StockAlert::None => "",
    }
}

/// Shortens to `width` characters, marking the cut with `~`.
fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut clipped: String = value.chars().take(width - 1).collect();
        clipped.push('~');
        clipped
    }
}

// =============================================================================
// categories / dashboard / history
// =============================================================================

/// `shelfbook categories`
pub async fn categories(ledger: &Ledger) -> ApiResult<Output> {
    let categories = ledger.categories().await;
    let text = if categories.is_empty() {
        "No categories yet.".to_string()
    } else {
        categories.join("\n")
    };
    Output::with_json(text, &categories)
}

/// `shelfbook dashboard`
pub async fn dashboard(ledger: &Ledger) -> ApiResult<Output> {
    let summary = ledger.dashboard().await;
    let symbol = &ledger.settings().currency_symbol;

    let text = format!(
        "Products:        {}\nUnits in stock:  {}\nStock value:     {}\nLow stock:       {}",
        summary.count,
        summary.total_quantity,
        summary.total_value.format_with_symbol(symbol),
        summary.low_stock_count,
    );
    Output::with_json(text, &summary)
}

/// `shelfbook history`
pub async fn history(ledger: &Ledger, limit: Option<usize>) -> ApiResult<Output> {
    let mut entries = ledger.history().await;
    if let Some(limit) = limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }

    if entries.is_empty() {
        return Ok(Output::new("No stock history yet.", json!([])));
    }

    let text = entries
        .iter()
        .map(history_line)
        .collect::<Vec<_>>()
        .join("\n");
    Output::with_json(text, &entries)
}

fn history_line(entry: &HistoryEntry) -> String {
    let quantity = match (entry.kind, entry.previous_quantity) {
        (HistoryKind::Updated, Some(before)) => format!("qty {} -> {}", before, entry.quantity),
        _ => format!("qty {}", entry.quantity),
    };
    format!(
        "{:<19}  {:<7}  {}  ({})",
        entry.date,
        entry.kind.to_string(),
        entry.name,
        quantity
    )
}
