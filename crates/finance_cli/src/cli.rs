use std::path::PathBuf;

use clap::{Parser, Subcommand};
use finance_core::SortKey;

const SORT_KEYS: [SortKey; 7] = [
    SortKey::DateAsc,
    SortKey::DateDesc,
    SortKey::AmountAsc,
    SortKey::AmountDesc,
    SortKey::DescriptionAsc,
    SortKey::DescriptionDesc,
    SortKey::CategoryAsc,
];

/// Accepts only the named sort orders; `list` without `--sort` keeps
/// insertion order.
pub fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    SORT_KEYS
        .into_iter()
        .find(|key| key.as_str() == value)
        .ok_or_else(|| {
            let names = SORT_KEYS.map(SortKey::as_str).join(", ");
            format!("sort key must be one of: {names}")
        })
}

#[derive(Debug, Parser)]
#[command(
    name = "finance",
    version = finance_core::core_version(),
    about = "personal finance record tracker",
    disable_help_subcommand = true,
    after_help = "Set FINANCE_LOG_DIR to an absolute directory to enable file logging."
)]
pub struct Cli {
    /// Path of the finance database file (created on first use)
    pub db: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show totals, top category and budget headroom
    Stats,
    /// Show daily spending for the last seven days
    Chart,
    /// List records, optionally filtered and sorted
    List {
        /// Case-insensitive regular expression matched against every field
        #[arg(default_value = "")]
        term: String,
        /// Sort order, e.g. date-desc or description-asc
        #[arg(long, value_parser = parse_sort_key)]
        sort: Option<SortKey>,
    },
    /// Validate and add a record
    Add {
        description: String,
        /// Non-negative amount with at most two decimals
        amount: String,
        category: String,
        /// Calendar date (YYYY-MM-DD)
        date: String,
    },
    /// Delete every record with the given id
    Delete { id: String },
    /// Print all records as pretty JSON
    Export,
    /// Replace all records with the contents of a JSON export
    Import {
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::{parse_sort_key, Cli, Commands};
    use clap::Parser;
    use finance_core::SortKey;

    #[test]
    fn sort_key_parser_accepts_named_orders_only() {
        assert_eq!(parse_sort_key("date-desc"), Ok(SortKey::DateDesc));
        assert_eq!(parse_sort_key("category-asc"), Ok(SortKey::CategoryAsc));
        let err = parse_sort_key("price-asc").unwrap_err();
        assert!(err.contains("description-desc"));
    }

    #[test]
    fn list_takes_term_and_sort() {
        let cli = Cli::try_parse_from(["finance", "db.sqlite", "list", "food", "--sort", "amount-asc"])
            .unwrap();
        assert_eq!(cli.db.to_str(), Some("db.sqlite"));
        assert!(matches!(
            cli.command,
            Commands::List { ref term, sort: Some(SortKey::AmountAsc) } if term == "food"
        ));
    }

    #[test]
    fn add_requires_every_field() {
        assert!(Cli::try_parse_from(["finance", "db.sqlite", "add", "Coffee", "3.50"]).is_err());
    }

    #[test]
    fn unknown_sort_key_is_a_usage_error() {
        assert!(Cli::try_parse_from(["finance", "db.sqlite", "list", "--sort", "nope"]).is_err());
    }
}
