//! Command line definition.
//!
//! Every section of the ledger page is a subcommand:
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────┐
//! │ Page section         │ Subcommand                                   │
//! ├──────────────────────┼──────────────────────────────────────────────┤
//! │ product form         │ add, edit                                    │
//! │ delete button        │ delete <ID> | delete --at <POS>              │
//! │ table, search, pager │ list --filter --category --page              │
//! │ category selector    │ categories                                   │
//! │ dashboard cards      │ dashboard                                    │
//! │ stock history        │ history                                      │
//! │ export buttons       │ export csv | export text                     │
//! │ tax calculator       │ tax <AMOUNT>                                 │
//! │ login form           │ login                                        │
//! └──────────────────────┴──────────────────────────────────────────────┘
//! ```

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use shelfbook_core::export::{CSV_FILE_NAME, TEXT_FILE_NAME};
use shelfbook_core::ProductInput;

#[derive(Debug, Parser)]
#[command(
    name = "shelfbook",
    about = "Inventory ledger with VAT valuation, stock alerts and exports",
    version
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    pub json: bool,

    #[arg(long, global = true, value_name = "PATH", help = "SQLite database file")]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH", help = "Config file (shelfbook.toml)")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a product
    Add(ProductArgs),

    /// Edit a product by id; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete a product by id or by list position
    Delete(DeleteArgs),

    /// List products (search, category filter, pages)
    List(ListArgs),

    /// Distinct categories in the ledger
    Categories,

    /// Product count, units, stock value and low-stock count
    Dashboard,

    /// Stock history, newest last
    History {
        #[arg(long, help = "Show only the most recent N entries")]
        limit: Option<usize>,
    },

    /// Export every product
    Export(ExportArgs),

    /// VAT calculator
    Tax {
        #[arg(allow_hyphen_values = true, help = "Base amount, e.g. 2000")]
        amount: String,
    },

    /// Check the demo login
    Login(LoginArgs),
}

/// The product form. Numbers stay text until validation.
#[derive(Debug, Clone, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, allow_hyphen_values = true)]
    pub cost: String,
    #[arg(long = "qty", alias = "quantity", allow_hyphen_values = true)]
    pub quantity: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub brand: String,
    #[arg(long, default_value = "")]
    pub size: String,
    #[arg(long, default_value = "", value_name = "YYYY-MM-DD")]
    pub expiry: String,
    #[arg(long, default_value = "")]
    pub supplier: String,
    #[arg(long = "reorder", default_value = "")]
    pub reorder_level: String,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        ProductInput {
            name: args.name,
            cost_price: args.cost,
            quantity: args.quantity,
            category: args.category,
            brand: args.brand,
            size: args.size,
            expiry_date: args.expiry,
            supplier: args.supplier,
            reorder_level: args.reorder_level,
        }
    }
}

/// Partial product form for `edit`. Pass an empty string to clear a field.
#[derive(Debug, Clone, Default, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub cost: Option<String>,
    #[arg(long = "qty", alias = "quantity", allow_hyphen_values = true)]
    pub quantity: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub expiry: Option<String>,
    #[arg(long)]
    pub supplier: Option<String>,
    #[arg(long = "reorder")]
    pub reorder_level: Option<String>,
}

impl EditArgs {
    /// Overlays the given fields onto the current form.
    pub fn apply_to(self, form: &mut ProductInput) {
        let fields = [
            (self.name, &mut form.name),
            (self.cost, &mut form.cost_price),
            (self.quantity, &mut form.quantity),
            (self.category, &mut form.category),
            (self.brand, &mut form.brand),
            (self.size, &mut form.size),
            (self.expiry, &mut form.expiry_date),
            (self.supplier, &mut form.supplier),
            (self.reorder_level, &mut form.reorder_level),
        ];
        for (change, slot) in fields {
            if let Some(value) = change {
                *slot = value;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cost.is_none()
            && self.quantity.is_none()
            && self.category.is_none()
            && self.brand.is_none()
            && self.size.is_none()
            && self.expiry.is_none()
            && self.supplier.is_none()
            && self.reorder_level.is_none()
    }
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    #[arg(required_unless_present = "at", conflicts_with = "at")]
    pub id: Option<String>,

    #[arg(long, value_name = "POS", help = "1-based position in store order")]
    pub at: Option<usize>,

    #[arg(long, short = 'y', action = ArgAction::SetTrue, help = "Skip the confirmation prompt")]
    pub yes: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long, short = 'f', default_value = "", help = "Match name or category")]
    pub filter: String,

    #[arg(long, short = 'c', help = "Exact category")]
    pub category: Option<String>,

    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Text,
}

impl ExportFormat {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_FILE_NAME,
            ExportFormat::Text => TEXT_FILE_NAME,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub format: ExportFormat,

    #[arg(
        long,
        short = 'o',
        value_name = "PATH",
        help = "Write to a file instead of stdout ('-' for stdout)"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    #[arg(long, short = 'u')]
    pub username: String,

    #[arg(long, help = "Prompted for when omitted")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "shelfbook", "add", "--name", "Rice", "--cost", "1000", "--qty", "4", "--category",
            "Grains", "--reorder", "5",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        let input = ProductInput::from(args);
        assert_eq!(input.name, "Rice");
        assert_eq!(input.cost_price, "1000");
        assert_eq!(input.reorder_level, "5");
        assert_eq!(input.brand, "");
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["shelfbook", "dashboard", "--json", "--db", "x.db"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn test_delete_needs_target() {
        assert!(Cli::try_parse_from(["shelfbook", "delete"]).is_err());
        assert!(Cli::try_parse_from(["shelfbook", "delete", "abc", "--at", "2"]).is_err());

        let cli = Cli::try_parse_from(["shelfbook", "delete", "--at", "2", "-y"]).unwrap();
        let Command::Delete(args) = cli.command else {
            panic!("expected delete");
        };
        assert_eq!(args.at, Some(2));
        assert!(args.yes);
    }

    #[test]
    fn test_edit_overlay() {
        let mut form = ProductInput {
            name: "Rice".to_string(),
            cost_price: "1000".to_string(),
            quantity: "4".to_string(),
            category: "Grains".to_string(),
            ..Default::default()
        };
        let changes = EditArgs {
            quantity: Some("9".to_string()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply_to(&mut form);
        assert_eq!(form.quantity, "9");
        assert_eq!(form.category, "");
        assert_eq!(form.name, "Rice");
        assert!(EditArgs::default().is_empty());
    }

    #[test]
    fn test_tax_accepts_negative_text() {
        let cli = Cli::try_parse_from(["shelfbook", "tax", "-5"]).unwrap();
        assert!(matches!(cli.command, Command::Tax { amount } if amount == "-5"));
    }
}
