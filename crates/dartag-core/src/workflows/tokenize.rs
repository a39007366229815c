use tracing::{info, instrument};

use crate::core::io::table::ReactionTable;
use crate::engine::config::{TokenizationConfig, TokenizationMode};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tokenization::{
    detokenize_and_split_enzymatic_reaction_smiles, tokenize_and_split_enzymatic_reaction_smiles,
};

/// Appends `reactants` and `products` columns (plus `ec` when detokenizing)
/// derived from the configured reaction column.
#[instrument(skip_all, name = "tokenize_workflow")]
pub fn run(
    table: &ReactionTable,
    config: &TokenizationConfig,
    reporter: &ProgressReporter,
) -> Result<ReactionTable, EngineError> {
    let reactions = table.column(&config.column)?;
    let mut reactants = Vec::with_capacity(reactions.len());
    let mut ecs = Vec::with_capacity(reactions.len());
    let mut products = Vec::with_capacity(reactions.len());

    reporter.phase("Tokenizing", reactions.len() as u64, || -> Result<(), EngineError> {
        for rxn in &reactions {
            match config.mode {
                TokenizationMode::Tokenize => {
                    let (r, p) = tokenize_and_split_enzymatic_reaction_smiles(rxn)?;
                    reactants.push(r);
                    products.push(p);
                }
                TokenizationMode::Detokenize => {
                    let (r, ec, p) = detokenize_and_split_enzymatic_reaction_smiles(rxn)?;
                    reactants.push(r);
                    ecs.push(ec.unwrap_or_default());
                    products.push(p);
                }
            }
            reporter.advance(1);
        }
        Ok(())
    })?;

    let mut output = table.clone();
    output.set_column("reactants", reactants)?;
    if config.mode == TokenizationMode::Detokenize {
        output.set_column("ec", ecs)?;
    }
    output.set_column("products", products)?;

    info!("{:?} finished for {} reaction(s).", config.mode, output.len());
    Ok(output)
}
