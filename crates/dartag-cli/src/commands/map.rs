use crate::cli::MapArgs;
use crate::commands::{read_table, write_table};
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dartag::{
    core::io::table::derived_path,
    engine::{mapping::CommandMapper, progress::ProgressReporter},
    workflows,
};
use tracing::info;

pub fn run(args: MapArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let settings = PartialConfig::load(args.config.as_deref())?.merge_map_args(&args)?;

    let table = read_table(&args.input)?;
    let mapper = CommandMapper::new(settings.program, settings.program_args);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Mapping {} reaction(s) with `{}`...",
        table.len(),
        mapper.program()
    );
    let mapped = workflows::map::run(&table, &mapper, &settings.config, &reporter)?;

    let output_path = derived_path(&args.input, ".mapped.csv");
    write_table(&mapped, &output_path)?;
    println!("✓ Mapped reactions written to: {}", output_path.display());

    Ok(())
}
