use std::path::{Path, PathBuf};

use chrono::{Local, Timelike};

use crate::{
  generator::{GeneratedUnit, GenerationStats, GeneratorOptions, Orchestrator},
  ui::{Colors, GenerateCommand, colors::paint},
  utils::spec::DocumentSet,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub dir: PathBuf,
  pub options: GeneratorOptions,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      dir,
      import_prefix,
      required_as_optional,
      verbose,
      quiet,
    } = command;

    let import_prefix = import_prefix.trim().trim_end_matches("::").to_string();
    if import_prefix.is_empty() || import_prefix.split("::").any(str::is_empty) {
      anyhow::bail!("Invalid import prefix '{import_prefix}': expected a module path such as crate::generated");
    }

    Ok(Self {
      input,
      dir,
      options: GeneratorOptions {
        import_prefix,
        required_as_optional,
      },
      verbose,
      quiet,
    })
  }

  /// `<dir>/generated`, the parent of every unit directory.
  pub fn output_root(&self) -> PathBuf {
    self.dir.join("generated")
  }
}

/// Writes the three files of a unit into `<root>/<unit>/`.
async fn write_unit(root: &Path, unit: &GeneratedUnit) -> anyhow::Result<PathBuf> {
  let directory = root.join(&unit.unit);
  tokio::fs::create_dir_all(&directory).await?;
  tokio::fs::write(directory.join("mod.rs"), &unit.sources.module).await?;
  tokio::fs::write(directory.join("models.rs"), &unit.sources.models).await?;
  tokio::fs::write(directory.join("handlers.rs"), &unit.sources.handlers).await?;
  Ok(directory)
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", paint(format_timestamp(), self.colors.timestamp()));
    }
  }

  fn detail(&self, message: &str) {
    if self.config.verbose {
      self.info(&paint(message, self.colors.info()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        paint(label, self.colors.label()),
        paint(value, self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(&paint(
      format!("Loading OpenAPI document from: {}", self.config.input.display()),
      self.colors.primary(),
    ));
  }

  fn log_documents(&self, documents: &DocumentSet) {
    self.detail(&format!("Loaded {} document(s)", documents.len()));
    for document in documents.iter() {
      self.detail(&format!("  {} -> unit {}", document.path.display(), document.unit));
    }
  }

  fn log_generating(&self) {
    self.info(&paint("Generating service scaffold...", self.colors.primary()));
  }

  fn log_unit_written(&self, unit: &GeneratedUnit, directory: &Path) {
    self.detail(&format!("Wrote unit {} ({}) to {}", unit.unit, unit.source, directory.display()));
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Units generated:", stats.units_generated.to_string());
    self.stat("Models generated:", stats.models_generated.to_string());
    self.stat("", format!("{} structs", stats.structs_generated));
    self.stat("", format!("{} array aliases", stats.array_aliases_generated));
    self.stat("", format!("{} type aliases", stats.type_aliases_generated));
    self.stat("Operations converted:", stats.operations_converted.to_string());
    self.stat("Deep validators:", stats.deep_validators_generated.to_string());
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          paint(format!("Cycle {}", i + 1), self.colors.accent()),
          paint(cycle.join(" -> "), self.colors.info())
        );
      }
    }
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      if !(warning.is_skipped_item() || self.config.verbose) {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        paint(label, self.colors.accent()),
        paint(warning, self.colors.primary())
      );
    }
  }

  fn log_writing(&self, root: &Path) {
    self.info(&paint(format!("Writing to: {}", root.display()), self.colors.primary()));
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        paint(format_timestamp(), self.colors.timestamp()),
        paint("Successfully generated service scaffold", self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let documents = DocumentSet::load(&config.input).await?;
  logger.log_documents(&documents);

  logger.log_generating();
  let output = Orchestrator::new(documents, config.options.clone()).generate()?;
  logger.print_statistics(&output.stats);

  let root = config.output_root();
  logger.log_writing(&root);
  for unit in &output.units {
    let directory = write_unit(&root, unit).await?;
    logger.log_unit_written(unit, &directory);
  }

  logger.log_success();
  Ok(())
}
