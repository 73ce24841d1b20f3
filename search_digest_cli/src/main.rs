use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenv::dotenv;
use search_digest_cli::{
    config::ScraperConfig, run_search, utils, MaxResults, SearchReport,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search query
    #[arg(short, long, default_value = "Alternate Suspension Program")]
    query: String,

    /// Number of result pages to analyse
    #[arg(short, long, default_value_t = MaxResults::DEFAULT,
          value_parser = clap::value_parser!(u16).range(MaxResults::MIN as i64..=MaxResults::MAX as i64).map(usize::from))]
    max_results: usize,

    /// Also write the report as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ScraperConfig::from_env()?;
    let max_results = MaxResults::new(args.max_results)?;

    println!("🔍 Fetching results for '{}'...", args.query);
    let report = match run_search(&config, &args.query, max_results).await {
        Ok(report) => report,
        Err(e) if e.is_provider_failure() => {
            eprintln!("❌ Failed to retrieve results count. ({e})");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            eprintln!("❌ {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    print_report(&report);

    if let Some(path) = args.output {
        utils::save_json(&report, &path)?;
        println!("✅ {} written.", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &SearchReport) {
    if let Some(top) = &report.top_website {
        println!("\nTop Website:\n{top}");
    }

    println!("\nTop {} Most Frequent Words:", report.top_words.len());
    print!("{}", utils::render_bar_chart(&report.top_words));

    if !report.summary.is_empty() {
        println!("\nSummary:\n{}", report.summary);
    }

    println!("\nPopularity/Number of searches:\n{}", report.results_count);

    let warnings = report.warnings();
    if !warnings.is_empty() {
        eprintln!();
        for warning in warnings {
            eprintln!("⚠️ {warning}");
        }
    }
}
