use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConfig {
    pub reaction_column: String,
    pub batch_size: usize,
}

#[derive(Default)]
pub struct MappingConfigBuilder {
    reaction_column: Option<String>,
    batch_size: Option<usize>,
}

impl MappingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reaction_column(mut self, column: impl Into<String>) -> Self {
        self.reaction_column = Some(column.into());
        self
    }
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn build(self) -> Result<MappingConfig, ConfigError> {
        let batch_size = self
            .batch_size
            .ok_or(ConfigError::MissingParameter("batch_size"))?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(MappingConfig {
            reaction_column: self
                .reaction_column
                .ok_or(ConfigError::MissingParameter("reaction_column"))?,
            batch_size,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggingConfig {
    pub mapped_column: String,
    pub remove_unmapped: bool,
    pub max_tags: usize,
}

#[derive(Default)]
pub struct TaggingConfigBuilder {
    mapped_column: Option<String>,
    remove_unmapped: Option<bool>,
    max_tags: Option<usize>,
}

impl TaggingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapped_column(mut self, column: impl Into<String>) -> Self {
        self.mapped_column = Some(column.into());
        self
    }
    pub fn remove_unmapped(mut self, remove: bool) -> Self {
        self.remove_unmapped = Some(remove);
        self
    }
    pub fn max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = Some(max_tags);
        self
    }

    pub fn build(self) -> Result<TaggingConfig, ConfigError> {
        Ok(TaggingConfig {
            mapped_column: self
                .mapped_column
                .ok_or(ConfigError::MissingParameter("mapped_column"))?,
            remove_unmapped: self
                .remove_unmapped
                .ok_or(ConfigError::MissingParameter("remove_unmapped"))?,
            max_tags: self
                .max_tags
                .ok_or(ConfigError::MissingParameter("max_tags"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentConfig {
    /// Combinations drawn per subset size.
    pub permutations: usize,
    pub seed: Option<u64>,
    /// Abort on a row with too few combinations instead of skipping it.
    pub fail_on_insufficient: bool,
}

#[derive(Default)]
pub struct AugmentConfigBuilder {
    permutations: Option<usize>,
    seed: Option<u64>,
    fail_on_insufficient: Option<bool>,
}

impl AugmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permutations(mut self, n: usize) -> Self {
        self.permutations = Some(n);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn fail_on_insufficient(mut self, fail: bool) -> Self {
        self.fail_on_insufficient = Some(fail);
        self
    }

    pub fn build(self) -> Result<AugmentConfig, ConfigError> {
        Ok(AugmentConfig {
            permutations: self
                .permutations
                .ok_or(ConfigError::MissingParameter("permutations"))?,
            seed: self.seed,
            fail_on_insufficient: self
                .fail_on_insufficient
                .ok_or(ConfigError::MissingParameter("fail_on_insufficient"))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizationMode {
    Tokenize,
    Detokenize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizationConfig {
    pub column: String,
    pub mode: TokenizationMode,
}

#[derive(Default)]
pub struct TokenizationConfigBuilder {
    column: Option<String>,
    mode: Option<TokenizationMode>,
}

impl TokenizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
    pub fn mode(mut self, mode: TokenizationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<TokenizationConfig, ConfigError> {
        Ok(TokenizationConfig {
            column: self.column.ok_or(ConfigError::MissingParameter("column"))?,
            mode: self.mode.ok_or(ConfigError::MissingParameter("mode"))?,
        })
    }
}
