//! CLI: synthesize enum case accessors in Swift sources → (rewrite | preview | check)
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::config::Config;
use crate::driver::{self, FileStatus, Mode, Report};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// add a computed `var` per enum case, exposing its payload as an optional you can read and set
#[derive(Parser, Debug)]
#[command(name = "enum-props", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// add missing accessors, in place or as a preview
    Generate(GenerateCmd),
    /// fail if any file is missing accessors; never writes
    Check(CheckCmd),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths, directories or quoted glob patterns
    #[arg(num_args = 1.., required = true)]
    input: Vec<String>,

    /// JSON config file (indent_width, extensions, exclude, mirror_access)
    #[arg(long)]
    config: Option<PathBuf>,

    /// summary format (written to stderr, or stdout for json outside of --dry-run)
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(clap::Parser, Debug)]
struct GenerateCmd {
    #[command(flatten)]
    input_settings: InputSettings,

    /// print rewritten sources to stdout instead of writing files
    #[arg(long)]
    dry_run: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckCmd {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path).context("failed to load configuration"),
            None => Ok(Config::default()),
        }
    }

    fn process(&self, mode: Mode) -> Result<Report> {
        let config = self.load_config()?;
        let paths = driver::resolve_inputs(&self.input, &config)
            .context("failed to resolve input file paths")?;
        tracing::debug!(files = paths.len(), ?mode, "resolved inputs");
        Ok(driver::run(&paths, &config, mode))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Generate(target) => {
                let mode = if target.dry_run { Mode::Preview } else { Mode::Write };
                let report = target.input_settings.process(mode)?;

                // 1) preview: rewritten sources go to stdout, everything else to stderr
                if target.dry_run {
                    let mut stdout = std::io::stdout().lock();
                    for file in &report.files {
                        if let Some(output) = &file.output {
                            writeln!(stdout, "// {}", file.path.display())?;
                            write!(stdout, "{output}")?;
                        }
                    }
                }

                // 2) summary
                emit_report(&report, target.input_settings.report, target.dry_run)?;
                Ok(exit_code(report.failed() == 0))
            }
            Command::Check(target) => {
                let report = target.input_settings.process(Mode::Preview)?;
                emit_report(&report, target.input_settings.report, false)?;
                Ok(exit_code(report.failed() == 0 && report.changed() == 0))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn emit_report(report: &Report, format: ReportFormat, stdout_taken: bool) -> Result<()> {
    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(report)?;
            if stdout_taken {
                eprintln!("{json}");
            } else {
                println!("{json}");
            }
        }
        ReportFormat::Text => {
            let mut err = std::io::stderr().lock();
            for file in &report.files {
                let status = match file.status {
                    FileStatus::Updated => "updated".green(),
                    FileStatus::WouldUpdate => "would update".yellow(),
                    FileStatus::Unchanged => continue,
                    FileStatus::Failed => "error".red().bold(),
                };
                writeln!(err, "{status} {}", file.path.display())?;
                if let Some(error) = &file.error {
                    writeln!(err, "  {error}")?;
                }
                for decl in file.declarations.iter().filter(|d| !d.added.is_empty()) {
                    let added = decl.added.iter().map(|n| format!("+{n}")).collect::<Vec<_>>();
                    write!(err, "  {}: {}", decl.name.to_string().bold(), added.join(", "))?;
                    if !decl.skipped.is_empty() {
                        let skipped = decl.skipped.iter().map(|n| n.to_string()).collect::<Vec<_>>();
                        write!(err, " {}", format!("(kept: {})", skipped.join(", ")).dimmed())?;
                    }
                    writeln!(err)?;
                }
            }
            let summary = format!(
                "{} file(s) scanned, {} with new accessors, {} failed",
                report.files.len(),
                report.changed(),
                report.failed(),
            );
            writeln!(err, "{}", summary.dimmed())?;
        }
    }
    Ok(())
}
