//! Command-line driver for `finance_core`.
//!
//! Opens the finance database named on the command line and runs one
//! record-store command. `FINANCE_LOG_DIR` enables file logging at the
//! default level.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use finance_core::db::open_db;
use finance_core::validation::validate_record_form;
use finance_core::{
    default_log_level, export_records, filter_records, highlight_matches, import_records,
    init_logging, sort_records, ImportOutcome, Persistence, RecordStore, SlotStore, SortKey,
    SqliteSlotStore,
};
use std::error::Error;
use std::io::{BufRead, Write};
use std::process::ExitCode;

const CHART_WIDTH: f64 = 30.0;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(log_dir) = std::env::var("FINANCE_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let conn = open_db(&cli.db)?;
    let mut store = RecordStore::open(Persistence::new(SqliteSlotStore::new(&conn)));

    match cli.command {
        Commands::Stats => print_stats(&store),
        Commands::Chart => print_chart(&store),
        Commands::List { term, sort } => {
            print_list(&store, &term, sort.unwrap_or(SortKey::Unsorted))
        }
        Commands::Add {
            description,
            amount,
            category,
            date,
        } => {
            let input = validate_record_form(&description, &amount, &category, &date)
                .map_err(|errors| format!("invalid record: {errors:?}"))?;
            let record = store.add_record(input)?;
            println!("added {}", record.id);
        }
        Commands::Delete { id } => {
            let removed = store.delete_record(&id)?;
            println!("removed {removed}");
        }
        Commands::Export => println!("{}", export_records(store.records())?),
        Commands::Import { file, yes } => {
            let raw = std::fs::read_to_string(&file)?;
            let outcome = import_records(&mut store, &raw, |count| yes || confirm_replace(count))?;
            match outcome {
                ImportOutcome::Imported(count) => println!("imported {count}"),
                ImportOutcome::Declined(count) => println!("kept existing records; skipped {count}"),
                ImportOutcome::Rejected(error) => return Err(error.into()),
            }
        }
    }
    Ok(())
}

/// Asks on stderr; anything but `y`/`yes` declines.
fn confirm_replace(count: usize) -> bool {
    eprint!("Replace all records with {count} imported records? [y/N] ");
    if std::io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_stats<S: SlotStore>(store: &RecordStore<S>) {
    let stats = store.dashboard_stats();
    let settings = store.settings();
    println!("records={}", stats.total_records);
    println!("spent={:.2} {}", stats.total_spent, settings.base_currency);
    println!("top_category={}", stats.top_category);
    println!(
        "remaining={:.2} cap={} exceeded={}",
        stats.remaining,
        settings.formatted_cap(),
        stats.is_exceeded
    );
}

fn print_chart<S: SlotStore>(store: &RecordStore<S>) {
    let chart = store.spending_chart_data();
    let max = chart.max_total();
    for day in &chart.days {
        let width = if max > 0.0 {
            (day.total / max * CHART_WIDTH).round() as usize
        } else {
            0
        };
        println!("{} {:>9.2} {}", day.date, day.total, "#".repeat(width));
    }
}

fn print_list<S: SlotStore>(store: &RecordStore<S>, term: &str, key: SortKey) {
    let view = sort_records(&filter_records(store.records(), term), key);
    for record in &view {
        println!(
            "{}\t{}\t{:.2}\t{}\t{}",
            record.id,
            record.date,
            record.amount,
            highlight_matches(&record.category, term),
            highlight_matches(&record.description, term)
        );
    }
}
