use anyhow::{bail, Result};
use clap::Parser;
use lotoetl::{extract, store, transform};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Load a lottery-draw JSON export into a normalized SQLite database.
#[derive(Parser)]
#[command(name = "lotoetl", version, about = "Lottery-draw JSON → SQLite ETL")]
struct Cli {
    /// Input JSON export (a record array, or an object wrapping one)
    #[arg(short, long)]
    input: String,

    /// Output SQLite database; required unless --preview is set
    #[arg(short, long)]
    output: Option<String>,

    /// Print a summary of the transformed data instead of writing it
    #[arg(long)]
    preview: bool,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();

    let records = extract::read_records(&cli.input)?;
    info!(records = records.len(), "input loaded");

    let out = transform::transform(&records)?;

    if cli.preview {
        print_preview(&records, &out);
        return Ok(());
    }

    let Some(output) = cli.output else {
        bail!("--output is required to persist; use --preview to only inspect");
    };

    let c = &out.counts;
    info!(
        missing_contest = c.missing_contest,
        missing_date = c.missing_date,
        missing_venue = c.missing_venue,
        missing_numbers = c.missing_numbers,
        invalid_state = c.invalid_state,
        "null report"
    );

    let mut conn = store::open(&output)?;
    let rows = store::load(&mut conn, &out)?;
    info!(rows, db = %output, "ETL finished");
    Ok(())
}

fn print_preview(records: &[Value], out: &transform::TransformOutput) {
    println!("\n=== PREVIEW ===");
    println!("Records in input file: {}", records.len());
    println!("Valid draws extracted: {}", out.draws.len());
    println!("Drawn numbers extracted: {}", out.numbers.len());
    println!("Prize tiers extracted: {}", out.tiers.len());
    println!("Winner locations extracted: {}", out.winners.len());
    let states: Vec<_> = out.seen_states.iter().copied().collect();
    println!("Valid states observed: {states:?}");

    let c = &out.counts;
    println!("\n--- Null / skipped-record report ---");
    println!("Records without a contest number (skipped): {}", c.missing_contest);
    println!("Records with a missing/invalid date: {}", c.missing_date);
    println!("Records with no venue: {}", c.missing_venue);
    println!("Records with no drawn numbers: {}", c.missing_numbers);
    println!("Invalid/missing state codes among winners: {}", c.invalid_state);

    println!("\n--- Samples ---");
    println!("Draws (first 5):");
    for d in out.draws.iter().take(5) {
        println!("  {d:?}");
    }
    println!("Drawn numbers (first 10):");
    for n in out.numbers.iter().take(10) {
        println!("  {n:?}");
    }
    println!("Prize tiers (first 5):");
    for t in out.tiers.iter().take(5) {
        println!("  {t:?}");
    }
    println!("Winner locations (first 5):");
    for w in out.winners.iter().take(5) {
        println!("  {w:?}");
    }
    println!("\n(use --output <file.db> to persist)");
}
