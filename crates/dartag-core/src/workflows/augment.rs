use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument, warn};

use crate::core::io::smiles::Smiles;
use crate::core::io::table::ReactionTable;
use crate::engine::combinations::permute_tagged_smiles;
use crate::engine::config::AugmentConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;

pub const AUGMENTED_HEADERS: [&str; 4] = ["source_row", "reactants", "tagged_products", "tagged_rxn"];

/// Expands every tagged reaction into sampled tag permutations, one output row
/// per permutation.
///
/// Rows are processed in order from a single generator, so a fixed seed gives
/// a reproducible output. Rows whose tagged products do not parse are always
/// skipped; `fail_on_insufficient` only turns a too-small size class into an
/// error.
#[instrument(skip_all, name = "augment_workflow")]
pub fn run(
    table: &ReactionTable,
    config: &AugmentConfig,
    reporter: &ProgressReporter,
) -> Result<ReactionTable, EngineError> {
    let reactants = table.column("reactants")?;
    let tagged_products = table.column("tagged_products")?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut output = ReactionTable::new(AUGMENTED_HEADERS);
    let mut skipped = 0usize;

    reporter.phase("Augmenting", table.len() as u64, || -> Result<(), EngineError> {
        for (row, (reactants, tagged)) in reactants.iter().zip(&tagged_products).enumerate() {
            reporter.advance(1);
            let permutations =
                match permute_tagged_smiles(&Smiles, tagged, config.permutations, &mut rng) {
                    Ok(permutations) => permutations,
                    Err(e @ EngineError::InsufficientCandidates { .. })
                        if config.fail_on_insufficient =>
                    {
                        return Err(e);
                    }
                    Err(e) => {
                        warn!("Skipping row {}: {}", row, e);
                        skipped += 1;
                        continue;
                    }
                };
            for permuted in permutations {
                let tagged_rxn = format!("{}>>{}", reactants, permuted);
                output.push_row(vec![row.to_string(), reactants.to_string(), permuted, tagged_rxn])?;
            }
        }
        Ok(())
    })?;

    info!(
        "Augmentation complete: {} row(s) written, {} input row(s) skipped.",
        output.len(),
        skipped
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::AugmentConfigBuilder;

    const FOUR_TAGS: &str = "Fc1ccc(C(=C(C2[CH2:1][CH2:1]2)[CH2:1][OH:1])c2ccc(F)cc2)cc1";
    const TWO_TAGS: &str = "CC[N:1]([CH2:1]C)C";

    fn config(k: usize, fail: bool) -> AugmentConfig {
        AugmentConfigBuilder::new()
            .permutations(k)
            .seed(Some(11))
            .fail_on_insufficient(fail)
            .build()
            .unwrap()
    }

    fn table(rows: &[(&str, &str)]) -> ReactionTable {
        let mut table = ReactionTable::new(["reactants", "tagged_products"]);
        for (r, p) in rows {
            table.push_row(vec![r.to_string(), p.to_string()]).unwrap();
        }
        table
    }

    #[test]
    fn writes_one_row_per_sampled_permutation() {
        let input = table(&[("CCO", FOUR_TAGS), ("CC", TWO_TAGS)]);
        let output = run(&input, &config(1, false), &ProgressReporter::new()).unwrap();

        assert_eq!(output.headers(), AUGMENTED_HEADERS);
        assert_eq!(output.column("source_row").unwrap(), vec!["0", "0", "0", "1"]);
        let rxns = output.column("tagged_rxn").unwrap();
        assert!(rxns[0].starts_with("CCO>>"));
        assert!(rxns[3].starts_with("CC>>"));
    }

    #[test]
    fn same_seed_gives_same_output() {
        let input = table(&[("CCO", FOUR_TAGS)]);
        let first = run(&input, &config(2, false), &ProgressReporter::new()).unwrap();
        let second = run(&input, &config(2, false), &ProgressReporter::new()).unwrap();
        assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn insufficient_rows_are_skipped_or_fatal() {
        let input = table(&[("CC", TWO_TAGS), ("CCO", FOUR_TAGS)]);

        let lenient = run(&input, &config(3, false), &ProgressReporter::new()).unwrap();
        assert!(lenient.column("source_row").unwrap().iter().all(|r| *r == "1"));

        let err = run(&input, &config(3, true), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientCandidates { .. }));
    }

    #[test]
    fn unparseable_rows_are_skipped_even_when_insufficiency_is_fatal() {
        let input = table(&[("CC", "C[N:1](C"), ("CCO", FOUR_TAGS)]);
        let output = run(&input, &config(1, true), &ProgressReporter::new()).unwrap();
        let sources = output.column("source_row").unwrap();
        assert_eq!(sources.len(), 3);
        assert!(sources.iter().all(|r| *r == "1"));
    }
}
