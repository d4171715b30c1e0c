#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use std::process::ExitCode;

use clap::Parser;

use crate::ui::{Cli, Colors, Commands, ListCommands, colors, commands};

mod generator;
mod ui;
mod utils;

async fn run(command: Commands, colors: &Colors) -> anyhow::Result<()> {
  match command {
    Commands::List {
      list_command: ListCommands::Operations { input },
    } => commands::list_operations(&input, colors).await,
    Commands::Generate(command) => commands::generate_code(commands::GenerateConfig::from_command(command)?, colors).await,
  }
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match run(cli.command, &colors).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(error) => {
      eprintln!("{} {error:#}", colors::paint("error:", colors.accent()));
      ExitCode::FAILURE
    }
  }
}
