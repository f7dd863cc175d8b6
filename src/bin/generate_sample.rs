use std::path::PathBuf;

use anyhow::Result;
use bikeshare_dashboard::data::sample;
use clap::Parser;

/// Write a synthetic hourly rental dataset in the hour.csv layout
#[derive(Parser, Debug)]
#[command(name = "generate-sample")]
struct Args {
    /// Output file (.csv, or .parquet for Parquet)
    #[arg(default_value = "sample_hour.csv")]
    output: PathBuf,

    /// Number of days to generate (24 rows each)
    #[arg(long, default_value_t = 365)]
    days: u32,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rows = sample::generate(args.days, args.seed);
    sample::write_file(&args.output, &rows)?;

    println!(
        "Wrote {} hourly rows ({} days) to {}",
        rows.len(),
        args.days,
        args.output.display()
    );
    Ok(())
}
