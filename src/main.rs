use anyhow::{bail, Context, Result};
use clap::Parser;
use dedupe_lib::profiling::{log_report, profile_table};
use dedupe_lib::run_entity_resolution_pipeline;
use dedupe_lib::utils::csv_io::{read_table_from_path, write_table_to_path};
use dedupe_lib::utils::env::load_env;
use dedupe_lib::utils::get_memory_usage;
use dedupe_lib::utils::pipeline_config::PipelineConfig;
use dedupe_lib::utils::progress_bars::progress_config::ProgressConfig;
use log::info;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Resolve duplicate company records into entity groups", long_about = None)]
struct Args {
    /// Delimited input table with a header row
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the resolved table
    #[arg(short, long)]
    output: PathBuf,

    /// Optional JSON file for run statistics
    #[arg(long)]
    stats_json: Option<PathBuf>,

    /// Log a profile of the input table before resolving
    #[arg(long)]
    profile: bool,

    /// Also write the input profile as JSON
    #[arg(long)]
    profile_json: Option<PathBuf>,

    /// Field delimiter for both input and output
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting company record deduplication");
    load_env();

    let args = Args::parse();
    if !args.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got {:?}", args.delimiter);
    }
    let delimiter = args.delimiter as u8;

    let config = PipelineConfig::from_env().context("Invalid pipeline configuration")?;
    config.log_config();

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );

    let load_start = Instant::now();
    let table = read_table_from_path(&args.input, delimiter)
        .with_context(|| format!("Failed to load input table {}", args.input.display()))?;
    info!("Loaded {} rows in {:.2?}", table.len(), load_start.elapsed());
    if progress_config.should_show_memory() {
        info!("Memory after load: {} MB", get_memory_usage());
    }

    if args.profile || args.profile_json.is_some() {
        let report = profile_table(&table);
        if args.profile {
            log_report(&report);
        }
        if let Some(path) = &args.profile_json {
            let file = File::create(path)
                .with_context(|| format!("Failed to create profile file {}", path.display()))?;
            serde_json::to_writer_pretty(file, &report).context("Failed to serialize profile")?;
            info!("Input profile written to {}", path.display());
        }
    }

    let (resolved, stats) = run_entity_resolution_pipeline(&table, &config, &progress_config)
        .context("Entity resolution failed")?;

    write_table_to_path(&resolved, &args.output, delimiter)
        .with_context(|| format!("Failed to write resolved table {}", args.output.display()))?;

    if let Some(path) = &args.stats_json {
        let file = File::create(path)
            .with_context(|| format!("Failed to create stats file {}", path.display()))?;
        serde_json::to_writer_pretty(file, &stats).context("Failed to serialize run statistics")?;
        info!("Run statistics written to {}", path.display());
    }

    info!(
        "Done: {} input rows resolved into {} rows ({} entity groups)",
        stats.input_rows, stats.output_rows, stats.distinct_group_ids
    );
    Ok(())
}
