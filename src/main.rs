// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use education_finder::loader::decode;
use education_finder::{
    filter, load_universities, logging, parse_text, preview_lines, render, Criteria,
    DatasetArgs, Loaded, Rendered, COLUMNS, NO_RESULTS,
};

#[derive(Parser, Debug)]
#[command(
    name = "education-finder",
    version,
    about = "Browse and filter a CSV of universities"
)]
struct Cli {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal browser (default)
    Browse,

    /// Print the universities matching the given criteria
    Search {
        /// Country, matched exactly (case-insensitive); "All" for any
        #[arg(long)]
        country: Option<String>,

        /// Field of study, matched as a substring; "All" for any
        #[arg(long)]
        field: Option<String>,

        /// Text matched against university name or city
        #[arg(long, short)]
        search: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how the CSV file is parsed
    Inspect {
        /// Number of raw lines to preview
        #[arg(long, default_value_t = 8)]
        lines: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => run_browse(&cli.dataset),
        Command::Search {
            country,
            field,
            search,
            json,
        } => {
            let criteria = Criteria {
                country,
                field,
                search,
            };
            run_search(&cli.dataset, &criteria, json)
        }
        Command::Inspect { lines } => run_inspect(&cli.dataset, lines),
    }
}

/// Load the dataset or halt with the error shown to the user.
fn load_or_exit(dataset: &DatasetArgs) -> Loaded {
    match load_universities(&dataset.csv_path, &dataset.encoding) {
        Ok(loaded) => loaded,
        Err(err) => {
            tracing::error!(error = %err, "failed to load dataset");
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    }
}

fn run_search(dataset: &DatasetArgs, criteria: &Criteria, json: bool) -> Result<()> {
    let table = load_or_exit(dataset).table;

    if json {
        let rows = filter(&table, criteria);
        if rows.is_empty() {
            eprintln!("⚠️  {}", NO_RESULTS);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("Failed to serialize results")?
        );
        return Ok(());
    }

    match render(&table, criteria) {
        Rendered::Cards(cards) => {
            println!("📚 Available Universities ({})\n", cards.len());
            for card in &cards {
                println!("🎓 {}", card.name);
                println!("   📍 {}", card.location);
                println!("   📘 {}", card.fields);
                println!("   🌐 {}\n", card.website);
            }
        }
        Rendered::NoResults => println!("⚠️  {}", NO_RESULTS),
    }

    Ok(())
}

fn run_inspect(dataset: &DatasetArgs, lines: usize) -> Result<()> {
    let bytes = std::fs::read(&dataset.csv_path)
        .with_context(|| format!("Failed to read {}", dataset.csv_path.display()))?;
    let text = decode(&bytes, &dataset.encoding)?;

    println!("🔍 Inspecting {}", dataset.csv_path.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\nRAW LINES (first {}):", lines);
    for preview in preview_lines(&text, lines) {
        println!("{:>3} {:?}", preview.number, preview.raw);
        println!(
            "    stripped={:?} parts={}",
            preview.stripped,
            preview.parts.len()
        );
    }

    match parse_text(&text) {
        Ok(loaded) => {
            println!("\n✓ Strategy: {}", loaded.strategy);
            println!(
                "✓ Columns: {} in file → {:?}",
                loaded.source_columns, COLUMNS
            );
            println!("✓ Records: {}", loaded.table.len());
            if let Some(first) = loaded.table.records().first() {
                println!(
                    "\nSAMPLE ROW: {}",
                    serde_json::to_string(first).context("Failed to serialize record")?
                );
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("\n{}", err.user_message());
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "tui")]
fn run_browse(dataset: &DatasetArgs) -> Result<()> {
    println!("🖥️  Loading Education Finder...\n");

    let loaded = load_or_exit(dataset);
    println!(
        "✓ Loaded {} universities ({})\n",
        loaded.table.len(),
        loaded.strategy
    );

    let mut app = ui::App::new(loaded.table);
    ui::run_ui(&mut app)?;

    println!("\n✅ Browser closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_browse(_dataset: &DatasetArgs) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: education-finder search --country <COUNTRY>");
    std::process::exit(1);
}
