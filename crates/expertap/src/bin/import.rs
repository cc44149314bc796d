//! Bulk import of CNSC decision files into the decision store
//!
//! Run with: cargo run -p expertap --features cli --bin expertap-import -- <DIR>

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use expertap::config::AppConfig;
use expertap::services::import::{decision_files, import_directory_with, ImportOptions};
use expertap::storage::DecisionDb;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Import CNSC decision text files (BO{year}_{bulletin}_... .txt) into ExpertAP
#[derive(Debug, Parser)]
#[command(name = "expertap-import")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory searched recursively for *.txt decision files
    dir: PathBuf,

    /// Database URL or path (overrides DATABASE_URL)
    #[arg(short, long)]
    database: Option<String>,

    /// Files committed per transaction
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Stop after this many files
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print the final statistics as JSON
    #[arg(long)]
    json: bool,

    /// Disable the progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expertap=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = args.database {
        config.database.url = url;
    }
    let options = ImportOptions {
        batch_size: args.batch_size.unwrap_or(config.database.import_batch_size),
        limit: args.limit,
    };

    let db = DecisionDb::open(&config.database)?;

    let mut total = decision_files(&args.dir)?.len() as u64;
    if let Some(limit) = options.limit {
        total = total.min(limit as u64);
    }

    let pb = if args.quiet || args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let stats = import_directory_with(&db, &args.dir, &options, |path| {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", style("Import finished").bold());
    println!("  Files:            {}", stats.total_files);
    println!("  Imported:         {}", style(stats.imported).green());
    println!("  Already existed:  {}", style(stats.already_existed).yellow());
    println!("  Skipped invalid:  {}", style(stats.skipped_invalid).yellow());
    println!("  Failed:           {}", style(stats.failed).red());
    for error in stats.errors.iter().take(10) {
        println!("    {}", style(error).dim());
    }
    if stats.errors.len() > 10 {
        println!("    ... {} more", stats.errors.len() - 10);
    }
    println!("  Decisions stored: {}", db.count()?);

    Ok(())
}
