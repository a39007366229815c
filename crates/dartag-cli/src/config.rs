mod defaults;

use crate::cli::{AugmentArgs, MapArgs, TagArgs, TokenizeArgs};
use crate::error::{CliError, Result};
use dartag::engine::config as core_config;
use defaults::DefaultsConfig;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialMappingConfig {
    reaction_column: Option<String>,
    batch_size: Option<usize>,
    mapper_command: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialTaggingConfig {
    mapped_column: Option<String>,
    remove_unmapped: Option<bool>,
    max_tags: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialAugmentConfig {
    permutations: Option<usize>,
    seed: Option<u64>,
    fail_on_insufficient: Option<bool>,
}

/// The optional TOML configuration file, with every key optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    mapping: Option<PartialMappingConfig>,
    tagging: Option<PartialTaggingConfig>,
    augment: Option<PartialAugmentConfig>,
}

/// A mapping configuration plus the mapper program to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSettings {
    pub config: core_config::MappingConfig,
    pub program: String,
    pub program_args: Vec<String>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let config_file_error = |source: anyhow::Error| CliError::ConfigFile {
            path: path.to_path_buf(),
            source,
        };
        let content = std::fs::read_to_string(path).map_err(|e| config_file_error(e.into()))?;
        toml::from_str(&content).map_err(|e| config_file_error(e.into()))
    }

    /// Reads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_map_args(mut self, args: &MapArgs) -> Result<MapSettings> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();
        let file = self.mapping.take().unwrap_or_default();

        let mut command = if args.mapper_command.is_empty() {
            file.mapper_command.unwrap_or_default()
        } else {
            args.mapper_command.clone()
        };
        if command.is_empty() {
            return Err(CliError::Argument(
                "A mapper command is required, via --mapper-command or `mapping.mapper-command`."
                    .to_string(),
            ));
        }
        let program = command.remove(0);

        let config = core_config::MappingConfigBuilder::new()
            .reaction_column(
                args.reaction_column
                    .clone()
                    .or(file.reaction_column)
                    .unwrap_or(defaults.reaction_column),
            )
            .batch_size(args.batch_size.or(file.batch_size).unwrap_or(defaults.batch_size))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(MapSettings {
            config,
            program,
            program_args: command,
        })
    }

    pub fn merge_tag_args(mut self, args: &TagArgs) -> Result<core_config::TaggingConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();
        let file = self.tagging.take().unwrap_or_default();

        let remove_unmapped = if args.remove_unmapped {
            true
        } else {
            file.remove_unmapped.unwrap_or(defaults.remove_unmapped)
        };

        core_config::TaggingConfigBuilder::new()
            .mapped_column(
                args.mapped_column
                    .clone()
                    .or(file.mapped_column)
                    .unwrap_or(defaults.mapped_column),
            )
            .remove_unmapped(remove_unmapped)
            .max_tags(args.max_tags.or(file.max_tags).unwrap_or(defaults.max_tags))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn merge_augment_args(mut self, args: &AugmentArgs) -> Result<core_config::AugmentConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();
        let file = self.augment.take().unwrap_or_default();

        let fail_on_insufficient = if args.fail_on_insufficient {
            true
        } else {
            file.fail_on_insufficient
                .unwrap_or(defaults.fail_on_insufficient)
        };

        core_config::AugmentConfigBuilder::new()
            .permutations(
                args.permutations
                    .or(file.permutations)
                    .unwrap_or(defaults.permutations),
            )
            .seed(args.seed.or(file.seed))
            .fail_on_insufficient(fail_on_insufficient)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "mapping.reaction-column" => {
                    self.mapping
                        .get_or_insert_with(Default::default)
                        .reaction_column = Some(value_str.to_string());
                }
                "mapping.batch-size" => {
                    self.mapping.get_or_insert_with(Default::default).batch_size =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "tagging.mapped-column" => {
                    self.tagging
                        .get_or_insert_with(Default::default)
                        .mapped_column = Some(value_str.to_string());
                }
                "tagging.remove-unmapped" => {
                    self.tagging
                        .get_or_insert_with(Default::default)
                        .remove_unmapped = Some(parse_value(key, value_str, "boolean")?);
                }
                "tagging.max-tags" => {
                    self.tagging.get_or_insert_with(Default::default).max_tags =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "augment.permutations" => {
                    self.augment
                        .get_or_insert_with(Default::default)
                        .permutations = Some(parse_value(key, value_str, "integer")?);
                }
                "augment.seed" => {
                    self.augment.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "augment.fail-on-insufficient" => {
                    self.augment
                        .get_or_insert_with(Default::default)
                        .fail_on_insufficient = Some(parse_value(key, value_str, "boolean")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Tokenization takes no file configuration; only the column has a default.
pub fn tokenization_config(args: &TokenizeArgs) -> Result<core_config::TokenizationConfig> {
    let mode = if args.detokenize {
        core_config::TokenizationMode::Detokenize
    } else {
        core_config::TokenizationMode::Tokenize
    };
    core_config::TokenizationConfigBuilder::new()
        .column(
            args.column
                .clone()
                .unwrap_or_else(|| DefaultsConfig::default().tokenize_column),
        )
        .mode(mode)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}
