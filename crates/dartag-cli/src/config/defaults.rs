#[derive(Debug, Clone)]
pub struct DefaultsConfig {
    pub reaction_column: String,
    pub batch_size: usize,
    pub mapped_column: String,
    pub remove_unmapped: bool,
    pub max_tags: usize,
    pub permutations: usize,
    pub fail_on_insufficient: bool,
    pub tokenize_column: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            reaction_column: "rxn".to_string(),
            batch_size: 64,
            mapped_column: "mapped_rxn".to_string(),
            remove_unmapped: false,
            max_tags: 10,
            permutations: 1,
            fail_on_insufficient: false,
            tokenize_column: "rxn".to_string(),
        }
    }
}
