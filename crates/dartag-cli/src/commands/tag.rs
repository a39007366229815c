use crate::cli::TagArgs;
use crate::commands::{read_table, write_table};
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dartag::{
    core::io::table::derived_path,
    engine::{error::EngineError, progress::ProgressReporter},
    workflows,
};
use tracing::{info, warn};

pub fn run(args: TagArgs) -> Result<()> {
    let config = PartialConfig::load(args.config.as_deref())?.merge_tag_args(&args)?;
    let table = read_table(&args.input)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Tagging {} reaction(s)...", table.len());
    let output = workflows::tag::run(&table, &config, &reporter)?;

    let tagged_path = derived_path(&args.input, ".tagged.csv");
    write_table(&output.tagged, &tagged_path)?;

    let stats_path = derived_path(&args.input, ".tagged_stats.csv");
    let stats_table = output.stats.to_table().map_err(EngineError::from)?;
    write_table(&stats_table, &stats_path)?;

    let filtered_path = derived_path(&args.input, ".tagged_filtered.csv");
    write_table(&output.filtered, &filtered_path)?;

    println!("Tag statistics over {} reaction(s):", output.stats.total());
    for bucket in output.stats.buckets() {
        println!(
            "  {:>4} tag(s): {:>8} ({:.2}%)",
            bucket.label, bucket.count, bucket.dataset_fraction
        );
    }

    if output.filtered.is_empty() {
        warn!("No reaction passed the tag count filter.");
        println!("Warning: no reaction has between 1 and {} tag(s).", config.max_tags);
    }

    info!(
        "Kept {} of {} reaction(s) after filtering.",
        output.filtered.len(),
        output.tagged.len()
    );
    println!("✓ Tagged reactions written to: {}", tagged_path.display());
    println!("✓ Tag statistics written to: {}", stats_path.display());
    println!("✓ Filtered reactions written to: {}", filtered_path.display());

    Ok(())
}
