//! # Product Commands
//!
//! The product form and the delete button.
//!
//! ## Delete Flow
//! ```text
//! shelfbook delete --at 3
//!        │
//!        ▼
//!  position ──► product_id_at(3) ──► id
//!        │
//!        ▼
//!  confirm "Delete 'Rice 5kg' (4 in stock)?"  (skipped with --yes)
//!        │ yes
//!        ▼
//!  delete_product(id) ──► Deleted history entry, persisted
//! ```

use serde_json::json;
use tracing::debug;

use shelfbook_core::Product;
use shelfbook_store::Ledger;

use super::{Output, Prompt};
use crate::cli::{DeleteArgs, EditArgs, ProductArgs};
use crate::error::{ApiError, ApiResult};

/// `shelfbook add`
pub async fn add(ledger: &Ledger, args: ProductArgs) -> ApiResult<Output> {
    let product = ledger.add_product(&args.into()).await?;
    let symbol = &ledger.settings().currency_symbol;

    Output::with_json(
        format!("Added {}\n{}", product.name, describe(&product, symbol)),
        &product,
    )
}

/// `shelfbook edit <ID>`
pub async fn edit(ledger: &Ledger, id: &str, changes: EditArgs) -> ApiResult<Output> {
    let mut form = ledger.edit_form(id).await?;
    if changes.is_empty() {
        debug!(id, "No fields given, re-saving current values");
    }
    changes.apply_to(&mut form);

    let product = ledger.update_product(id, &form).await?;
    let symbol = &ledger.settings().currency_symbol;

    Output::with_json(
        format!("Updated {}\n{}", product.name, describe(&product, symbol)),
        &product,
    )
}

/// `shelfbook delete <ID>` or `shelfbook delete --at <POS>`
pub async fn delete(
    ledger: &Ledger,
    args: DeleteArgs,
    prompt: &mut dyn Prompt,
) -> ApiResult<Output> {
    let id = match (args.id, args.at) {
        (Some(id), _) => id,
        (None, Some(position)) => ledger.product_id_at(position).await?,
        (None, None) => return Err(ApiError::validation("Give a product id or --at <POS>")),
    };

    let product = ledger
        .find(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    if !args.yes {
        let question = format!(
            "Delete '{}' ({} in stock)? [y/N] ",
            product.name, product.quantity
        );
        if !prompt.confirm(&question)? {
            return Ok(Output::new(
                "Cancelled",
                json!({ "deleted": false, "id": product.id }),
            ));
        }
    }

    let removed = ledger.delete_product(&id).await?;
    Ok(Output::new(
        format!("Deleted {}", removed.name),
        json!({ "deleted": true, "product": removed }),
    ))
}

/// Multi-line summary of one product's figures.
pub fn describe(product: &Product, symbol: &str) -> String {
    let mut lines = vec![
        format!("  id:          {}", product.id),
        format!("  cost price:  {}", product.cost_price.format_with_symbol(symbol)),
        format!("  VAT:         {}", product.vat.format_with_symbol(symbol)),
        format!("  shelf price: {}", product.shelf_price.format_with_symbol(symbol)),
        format!("  quantity:    {}", product.quantity),
        format!("  total value: {}", product.total_value.format_with_symbol(symbol)),
    ];
    if !product.category.is_empty() {
        lines.push(format!("  category:    {}", product.category));
    }
    if let Some(expiry) = product.expiry_date {
        lines.push(format!("  expires:     {}", expiry));
    }
    if product.reorder_level > 0 {
        lines.push(format!("  reorder at:  {}", product.reorder_level));
    }
    lines.join("\n")
}
