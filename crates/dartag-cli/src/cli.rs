use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "dartag developers",
    version,
    about = "dartag CLI - Atom-map reactions, tag their disconnection sites and prepare tagged datasets for retrosynthesis models.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Atom-map the reactions of a CSV file with an external mapping program.
    Map(MapArgs),
    /// Tag changed product atoms of mapped reactions and report tag statistics.
    Tag(TagArgs),
    /// Sample tag permutations of tagged reactions for data augmentation.
    Augment(AugmentArgs),
    /// Tokenize or detokenize enzymatic reaction SMILES.
    Tokenize(TokenizeArgs),
}

/// Arguments for the `map` subcommand.
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Path to the input CSV file with a column of reaction SMILES.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name of the column holding the reactions.
    #[arg(long, value_name = "NAME")]
    pub reaction_column: Option<String>,

    /// Number of reactions sent to the mapper per call.
    #[arg(long, value_name = "INT")]
    pub batch_size: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S mapping.batch-size=32
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Mapper program followed by its arguments. It reads one reaction per line
    /// on stdin and writes one mapped reaction per line on stdout.
    #[arg(
        long,
        value_name = "CMD",
        num_args(1..),
        allow_hyphen_values = true
    )]
    pub mapper_command: Vec<String>,
}

/// Arguments for the `tag` subcommand.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Path to a CSV file produced by `dartag map`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name of the column holding the mapped reactions.
    #[arg(long, value_name = "NAME")]
    pub mapped_column: Option<String>,

    /// Remove reactant components without any mapped atom.
    #[arg(short, long)]
    pub remove_unmapped: bool,

    /// Keep only reactions with at most this many tags in the filtered output.
    #[arg(long, value_name = "INT")]
    pub max_tags: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S tagging.max-tags=8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `augment` subcommand.
#[derive(Args, Debug)]
pub struct AugmentArgs {
    /// Path to a CSV file produced by `dartag tag` (the filtered output).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of tag combinations sampled per combination size.
    #[arg(short = 'k', long, value_name = "INT")]
    pub permutations: Option<usize>,

    /// Seed for the random generator; omit for a random seed.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Abort when a reaction has fewer combinations than requested instead of skipping it.
    #[arg(long)]
    pub fail_on_insufficient: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S augment.seed=42
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `tokenize` subcommand.
#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// Path to the input CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Name of the column holding the (tokenized) reactions.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Detokenize instead of tokenizing.
    #[arg(long)]
    pub detokenize: bool,
}
