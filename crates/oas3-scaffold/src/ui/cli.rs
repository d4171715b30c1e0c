use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::generator::DEFAULT_IMPORT_PREFIX;

#[derive(Parser, Debug)]
#[command(name = "oas3-scaffold")]
#[command(author, version, about = "OpenAPI 3 to axum service scaffold generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate models and handlers for every unit reachable from a document
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the root OpenAPI document (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory that receives `generated/<unit>/`
  #[arg(short = 'd', long = "dir", value_name = "DIR", default_value = "internal")]
  pub dir: PathBuf,

  /// Module path the unit modules are mounted under, used for cross-unit imports
  #[arg(short = 'p', long = "import-prefix", value_name = "PATH", default_value = DEFAULT_IMPORT_PREFIX)]
  pub import_prefix: String,

  /// Type required fields as optional and leave presence checks to deep validation
  #[arg(long, default_value_t = false)]
  pub required_as_optional: bool,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the operations of a document with their generated binding names
  Operations {
    /// Path to the OpenAPI document (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
