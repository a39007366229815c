use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::io::smiles::Smiles;
use crate::core::io::table::ReactionTable;
use crate::core::models::reaction::Reaction;
use crate::engine::combinations::count_combinations;
use crate::engine::config::TaggingConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::standardize::{
    remove_mapping, remove_unmapped_components, standardise_reaction_component,
};
use crate::engine::stats::TagStatistics;
use crate::engine::tagging::{count_tags, find_number_tags, tag_products};

/// Per-reaction results of tagging one mapped reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedReaction {
    /// Unmapped, standardised precursors.
    pub reactants: String,
    /// Mapped products as they appear in the input.
    pub products: String,
    pub tagged_products: String,
    pub num_tags: usize,
    pub tag_combinations: usize,
}

impl TaggedReaction {
    pub fn tagged_rxn(&self) -> String {
        format!("{}>>{}", self.reactants, self.tagged_products)
    }
}

#[derive(Debug, Clone)]
pub struct TaggingOutput {
    /// Input rows with the tagging columns appended.
    pub tagged: ReactionTable,
    pub stats: TagStatistics,
    /// Rows with `0 < num_tags <= max_tags`, with a `tagged_rxn` column.
    pub filtered: ReactionTable,
}

/// Tags a single mapped reaction. Products that fail to parse yield an empty
/// tagged product with zero tags.
pub fn tag_reaction(mapped_rxn: &str, remove_unmapped: bool) -> TaggedReaction {
    let (precursors, products) = match Reaction::parse_any(mapped_rxn) {
        Ok(reaction) => (reaction.precursors(), reaction.products_smiles()),
        Err(e) => {
            warn!("Skipping malformed mapped reaction: {}", e);
            (String::new(), String::new())
        }
    };

    let tagged_products = tag_products(&Smiles, &precursors, &products).unwrap_or_else(|e| {
        warn!("Could not tag products of '{}': {}", mapped_rxn, e);
        String::new()
    });

    let reactants = if remove_unmapped {
        remove_unmapped_components(&Smiles, &precursors)
    } else {
        precursors
    };
    let reactants = standardise_reaction_component(&Smiles, &remove_mapping(&Smiles, &reactants));

    let num_tags = count_tags(&Smiles, &tagged_products);
    let legacy = find_number_tags(&tagged_products);
    if num_tags != legacy {
        warn!(
            "Tag count mismatch for '{}': graph {} vs pattern {}",
            tagged_products, num_tags, legacy
        );
    }

    TaggedReaction {
        reactants,
        products,
        tag_combinations: count_combinations(&Smiles, &tagged_products),
        tagged_products,
        num_tags,
    }
}

#[instrument(skip_all, name = "tagging_workflow")]
pub fn run(
    table: &ReactionTable,
    config: &TaggingConfig,
    reporter: &ProgressReporter,
) -> Result<TaggingOutput, EngineError> {
    let mapped = table.column(&config.mapped_column)?;
    info!("Tagging {} mapped reaction(s).", mapped.len());

    let results: Vec<TaggedReaction> = reporter.phase("Tagging", mapped.len() as u64, || {
        #[cfg(feature = "parallel")]
        let iter = mapped.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = mapped.iter();

        iter.map(|rxn| {
            let tagged = tag_reaction(rxn, config.remove_unmapped);
            reporter.advance(1);
            tagged
        })
        .collect()
    });

    let mut tagged = table.clone();
    tagged.set_column("reactants", results.iter().map(|r| r.reactants.clone()).collect())?;
    tagged.set_column("products", results.iter().map(|r| r.products.clone()).collect())?;
    tagged.set_column(
        "tagged_products",
        results.iter().map(|r| r.tagged_products.clone()).collect(),
    )?;
    tagged.set_column("num_tags", results.iter().map(|r| r.num_tags.to_string()).collect())?;
    tagged.set_column(
        "tag_combinations",
        results.iter().map(|r| r.tag_combinations.to_string()).collect(),
    )?;

    let counts: Vec<usize> = results.iter().map(|r| r.num_tags).collect();
    let stats = TagStatistics::from_counts(&counts);

    let mask: Vec<bool> = counts
        .iter()
        .map(|&n| n > 0 && n <= config.max_tags)
        .collect();
    let mut filtered = tagged.filter_rows(&mask)?;
    let tagged_rxns: Vec<String> = results
        .iter()
        .zip(&mask)
        .filter(|(_, keep)| **keep)
        .map(|(r, _)| r.tagged_rxn())
        .collect();
    filtered.set_column("tagged_rxn", tagged_rxns)?;

    debug!("Tag distribution: {:?}", stats.buckets());
    info!(
        "Tagging complete: kept {} of {} reaction(s) with 1..={} tags.",
        filtered.len(),
        tagged.len(),
        config.max_tags
    );

    Ok(TaggingOutput {
        tagged,
        stats,
        filtered,
    })
}
