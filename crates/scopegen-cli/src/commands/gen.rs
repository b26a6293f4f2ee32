// Generate a snippet for a free-text query

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use scopegen_generation::{CodeGenerator, ComplexityTier, GeneratedResult, Provenance};
use scopegen_providers::DashScopeProvider;

use crate::commands::resolve_templates_dir;
use crate::error::{CliError, CliResult};
use crate::output::{render_report, OutputStyle};

/// Exit code for a usable result
pub const EXIT_OK: i32 = 0;
/// Exit code when produced code failed validation
pub const EXIT_VALIDATION_FAILED: i32 = 1;
/// Exit code when nothing could be produced at all
pub const EXIT_UNAVAILABLE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Minimal,
    Concise,
    Complete,
}

impl From<TierArg> for ComplexityTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Minimal => ComplexityTier::Minimal,
            TierArg::Concise => ComplexityTier::Concise,
            TierArg::Complete => ComplexityTier::Complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Print just the snippet
    Code,
    /// Human-readable report
    Text,
    /// The full result as JSON
    Json,
}

/// Arguments for `scopegen gen`
#[derive(Debug, Args)]
pub struct GenArgs {
    /// Free-text description of the snippet to generate
    pub query: String,

    /// Code complexity tier
    #[arg(short = 'c', long = "complexity", value_enum, default_value = "concise")]
    pub complexity: TierArg,

    /// Write the snippet to this file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Template corpus root
    #[arg(long = "templates-dir")]
    pub templates_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "code")]
    pub format: Format,
}

/// Map a result to the process exit code
pub fn exit_code_for(result: &GeneratedResult) -> i32 {
    if result.is_valid() {
        EXIT_OK
    } else if result.provenance == Provenance::None {
        EXIT_UNAVAILABLE
    } else {
        EXIT_VALIDATION_FAILED
    }
}

/// Execute the gen command, returning the process exit code
pub async fn run(args: GenArgs) -> CliResult<i32> {
    let style = OutputStyle::default();
    let corpus_dir = resolve_templates_dir(args.templates_dir);

    let mut generator =
        CodeGenerator::new(&corpus_dir).map_err(|e| CliError::Corpus(e.to_string()))?;

    match DashScopeProvider::from_env() {
        Ok(Some(provider)) => {
            generator = generator.with_provider(Arc::new(provider));
        }
        Ok(None) => {
            tracing::debug!("no generation backend configured, templates only");
        }
        Err(e) => return Err(CliError::Provider(e.to_string())),
    }

    let result = generator.generate(&args.query, args.complexity.into()).await;

    if result.is_valid() {
        if let Some(path) = &args.output {
            fs::write(path, &result.code)?;
            eprintln!("{}", style.success(&format!("Code written to {}", path.display())));
        }
    }

    match args.format {
        Format::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result)
                    .map_err(|e| CliError::Corpus(e.to_string()))?
            );
        }
        Format::Text => {
            println!("{}", render_report(&result, &style));
        }
        Format::Code => {
            if result.is_valid() {
                if args.output.is_none() {
                    println!("{}", result.code);
                }
            } else if let Some(report) = &result.validation {
                for error in &report.errors {
                    eprintln!("{}", style.error(error));
                }
            }
        }
    }

    Ok(exit_code_for(&result))
}
