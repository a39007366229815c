use tracing::{info, instrument, warn};

use crate::core::io::table::ReactionTable;
use crate::core::models::reaction::{EMPTY_REACTION, Reaction};
use crate::engine::config::MappingConfig;
use crate::engine::error::EngineError;
use crate::engine::mapping::{AtomMapper, map_in_chunks};
use crate::engine::progress::{Progress, ProgressReporter};

/// Name of the column holding the mapper's output.
pub const MAPPED_COLUMN: &str = "mapped_rxn";

/// Rewrites a reaction in `reactants>agents>products` form. Reactions that do
/// not parse are passed through unchanged for the mapper to reject.
pub fn normalise_reaction(rxn: &str) -> String {
    match Reaction::parse_any(rxn) {
        Ok(reaction) => reaction.to_string(),
        Err(e) => {
            warn!("Could not normalise reaction, keeping it as is: {}", e);
            rxn.to_string()
        }
    }
}

/// Normalises the reaction column in place and appends the mapped reactions
/// as [`MAPPED_COLUMN`].
#[instrument(skip_all, name = "mapping_workflow")]
pub fn run<M: AtomMapper + ?Sized>(
    table: &ReactionTable,
    mapper: &M,
    config: &MappingConfig,
    reporter: &ProgressReporter,
) -> Result<ReactionTable, EngineError> {
    let mut output = table.clone();

    let normalised: Vec<String> = table
        .column(&config.reaction_column)?
        .into_iter()
        .map(normalise_reaction)
        .collect();
    output.set_column(&config.reaction_column, normalised.clone())?;

    info!(
        "Mapping {} reaction(s) in batches of {}.",
        normalised.len(),
        config.batch_size
    );
    let mapped = reporter.phase("Atom mapping", normalised.len() as u64, || {
        map_in_chunks(mapper, &normalised, config.batch_size, reporter)
    });

    let failed = mapped.iter().filter(|r| *r == EMPTY_REACTION).count();
    if failed > 0 {
        reporter.report(Progress::Message(format!(
            "{} reaction(s) could not be mapped",
            failed
        )));
    }
    info!("Mapping complete: {} of {} reaction(s) failed.", failed, mapped.len());

    output.set_column(MAPPED_COLUMN, mapped)?;
    Ok(output)
}
