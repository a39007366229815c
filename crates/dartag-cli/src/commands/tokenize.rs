use crate::cli::TokenizeArgs;
use crate::commands::{read_table, write_table};
use crate::config::tokenization_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dartag::{
    core::io::table::derived_path,
    engine::{config::TokenizationMode, progress::ProgressReporter},
    workflows,
};

pub fn run(args: TokenizeArgs) -> Result<()> {
    let config = tokenization_config(&args)?;
    let table = read_table(&args.input)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let output = workflows::tokenize::run(&table, &config, &reporter)?;

    let suffix = match config.mode {
        TokenizationMode::Tokenize => ".tokenized.csv",
        TokenizationMode::Detokenize => ".detokenized.csv",
    };
    let output_path = derived_path(&args.input, suffix);
    write_table(&output, &output_path)?;
    println!("✓ Output written to: {}", output_path.display());

    Ok(())
}
