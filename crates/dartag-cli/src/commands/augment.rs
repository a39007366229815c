use crate::cli::AugmentArgs;
use crate::commands::{read_table, write_table};
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dartag::{
    core::io::table::derived_path, engine::progress::ProgressReporter, workflows,
};
use tracing::info;

pub fn run(args: AugmentArgs) -> Result<()> {
    let config = PartialConfig::load(args.config.as_deref())?.merge_augment_args(&args)?;
    match config.seed {
        Some(seed) => info!("Sampling with seed {}.", seed),
        None => info!("Sampling with a random seed."),
    }

    let table = read_table(&args.input)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Sampling up to {} permutation(s) per combination size for {} reaction(s)...",
        config.permutations,
        table.len()
    );
    let augmented = workflows::augment::run(&table, &config, &reporter)?;

    let output_path = derived_path(&args.input, ".augmented.csv");
    write_table(&augmented, &output_path)?;
    println!(
        "✓ {} augmented reaction(s) written to: {}",
        augmented.len(),
        output_path.display()
    );

    Ok(())
}
