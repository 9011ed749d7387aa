//! # Export
//!
//! Renders the full product list, in store order, as a downloadable table.
//!
//! ## Formats
//! ```text
//! to_csv             Name,Category,...,Total Value
//!                    Rice,Grains,,,,,5,1000,75,1075,4,4300
//!
//! to_delimited_text  Name<TAB>Category<TAB>...<TAB>Total Value
//!                    Rice<TAB>Grains<TAB>...<TAB>₦1075<TAB>4<TAB>₦4300
//! ```
//!
//! Amounts are unformatted (shortest decimal form). An unset expiry date
//! and a zero reorder level render as empty cells.

use csv::{Terminator, WriterBuilder};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, DATE_FORMAT};

/// Column headings shared by both formats.
pub const EXPORT_HEADER: [&str; 12] = [
    "Name",
    "Category",
    "Brand",
    "Size",
    "Supplier",
    "Expiry Date",
    "Reorder Level",
    "Cost Price",
    "VAT",
    "Shelf Price",
    "Quantity",
    "Total Value",
];

/// Suggested file name for the CSV export.
pub const CSV_FILE_NAME: &str = "inventory.csv";

/// Suggested file name for the delimited-text export.
pub const TEXT_FILE_NAME: &str = "inventory.txt";

/// Comma-separated export. Fields containing commas or quotes are quoted.
pub fn to_csv(products: &[Product]) -> CoreResult<String> {
    write_table(products, b',', |amount| amount.to_plain_string())
}

/// Tab-separated export with currency amounts prefixed by `symbol`.
pub fn to_delimited_text(products: &[Product], symbol: &str) -> CoreResult<String> {
    write_table(products, b'\t', |amount| {
        format!("{symbol}{}", amount.to_plain_string())
    })
}

fn write_table<F>(products: &[Product], delimiter: u8, amount: F) -> CoreResult<String>
where
    F: Fn(Money) -> String,
{
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| CoreError::Export(e.to_string()))?;

    for product in products {
        let expiry = product
            .expiry_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let reorder_level = match product.reorder_level {
            0 => String::new(),
            level => level.to_string(),
        };

        writer
            .write_record([
                product.name.clone(),
                product.category.clone(),
                product.brand.clone(),
                product.size.clone(),
                product.supplier.clone(),
                expiry,
                reorder_level,
                amount(product.cost_price),
                amount(product.vat),
                amount(product.shelf_price),
                product.quantity.to_string(),
                amount(product.total_value),
            ])
            .map_err(|e| CoreError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductDraft, TaxRate};
    use chrono::NaiveDate;

    fn product(name: &str, cost_minor: i64, quantity: u32, reorder_level: u32) -> Product {
        ProductDraft {
            name: name.to_string(),
            cost_price: Money::from_minor(cost_minor),
            quantity,
            category: "Grains".to_string(),
            brand: String::new(),
            size: String::new(),
            supplier: String::new(),
            expiry_date: None,
            reorder_level,
        }
        .into_product("p".to_string(), TaxRate::default())
    }

    #[test]
    fn test_csv_header_and_rows() {
        let mut beans = product("Beans", 1050, 3, 0);
        beans.expiry_date = NaiveDate::from_ymd_opt(2025, 6, 30);
        let products = vec![product("Rice", 100_000, 4, 5), beans];

        let csv = to_csv(&products).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Name,Category,Brand,Size,Supplier,Expiry Date,Reorder Level,Cost Price,VAT,Shelf Price,Quantity,Total Value"
        );
        assert_eq!(lines[1], "Rice,Grains,,,,,5,1000,75,1075,4,4300");
        assert_eq!(lines[2], "Beans,Grains,,,,2025-06-30,,10.5,0.79,11.29,3,33.87");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_quotes_delimiters() {
        let products = vec![product("Rice, long grain", 100_000, 4, 0)];
        let csv = to_csv(&products).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"Rice, long grain\",Grains"));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_delimited_text_prefixes_currency() {
        let text = to_delimited_text(&[product("Rice", 100_000, 4, 5)], "₦").unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row.split('\t').collect::<Vec<_>>(),
            ["Rice", "Grains", "", "", "", "", "5", "₦1000", "₦75", "₦1075", "4", "₦4300"]
        );
    }
}
