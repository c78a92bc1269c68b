//! CLI argument definitions for the dataset unifier.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "nutri-unify",
    version,
    about = "Unify heterogeneous nutrition and recipe CSV files",
    long_about = "Unify heterogeneous nutrition and recipe CSV files.\n\n\
                  Resolves differently named columns onto canonical fields, merges\n\
                  ingredient rows that describe the same food, and removes duplicate\n\
                  recipes. Also aggregates substitution tables and coerces diet tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge every CSV in a folder into unified ingredient and recipe tables.
    Unify(UnifyArgs),

    /// Aggregate ingredient substitutes into a JSON object.
    Substitutions(SubstitutionsArgs),

    /// Convert a diet table to JSON with numeric values coerced.
    Diet(DietArgs),

    /// Show the built-in mapping profiles.
    Profiles(ProfilesArgs),
}

#[derive(Parser)]
pub struct UnifyArgs {
    /// Folder containing the source CSV files.
    #[arg(value_name = "CSV_DIR")]
    pub csv_dir: PathBuf,

    /// Output directory for unified files (default: <CSV_DIR>/unified).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format to generate.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: OutputFormatArg,

    /// Ingredient mapping profile (TOML) replacing the built-in one.
    #[arg(long = "ingredient-profile", value_name = "FILE")]
    pub ingredient_profile: Option<PathBuf>,

    /// Recipe mapping profile (TOML) replacing the built-in one.
    #[arg(long = "recipe-profile", value_name = "FILE")]
    pub recipe_profile: Option<PathBuf>,

    /// Reconcile and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SubstitutionsArgs {
    /// Substitution CSV files, read in the order given.
    #[arg(value_name = "CSV", required = true)]
    pub inputs: Vec<PathBuf>,

    /// JSON file to write.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Substitution profile (TOML) replacing the built-in one.
    #[arg(long = "profile", value_name = "FILE")]
    pub profile: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DietArgs {
    /// Diet CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// JSON file to write.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Diet profile (TOML) replacing the built-in one.
    #[arg(long = "profile", value_name = "FILE")]
    pub profile: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ProfilesArgs {
    /// Only show this profile.
    #[arg(long = "kind", value_enum)]
    pub kind: Option<ProfileKindArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
    Both,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileKindArg {
    Ingredients,
    Recipes,
    Substitutions,
    Diets,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
