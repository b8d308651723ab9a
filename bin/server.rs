// Education Finder - Web Server

use clap::Parser;
use education_finder::server::{serve, AppState, Dataset};
use education_finder::{load_universities, logging, DatasetArgs};

#[derive(Parser, Debug)]
#[command(name = "finder-server", version, about = "Serve the Education Finder page")]
struct Cli {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Address to listen on
    #[arg(long, env = "FINDER_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    println!("🌐 Education Finder - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Load once; a failure is served as the error page rather than aborting
    let dataset = Dataset::from_load(load_universities(
        &cli.dataset.csv_path,
        &cli.dataset.encoding,
    ));

    match &dataset {
        Dataset::Ready(table) => {
            println!("✓ Loaded {} universities from {:?}", table.len(), cli.dataset.csv_path)
        }
        Dataset::Failed(message) => eprintln!("{}", message),
    }

    println!("\n🚀 Server running on http://{}", cli.addr);
    println!("   API: http://{}/api/universities", cli.addr);
    println!("\n   Press Ctrl+C to stop\n");

    serve(&cli.addr, AppState::new(dataset)).await
}
