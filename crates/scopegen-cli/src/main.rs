// scopegen CLI entry point

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};

use commands::{doctor, gen, templates};
use output::OutputStyle;

#[derive(Debug, Parser)]
#[command(
    name = "scopegen",
    version,
    about = "Generate AgentScope code snippets from free-text queries"
)]
struct Cli {
    /// Print debug-level logs to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a snippet for a query
    Gen(gen::GenArgs),
    /// List the templates in the corpus
    Templates(templates::TemplatesArgs),
    /// Check whether dynamic generation is available
    Doctor(doctor::DoctorArgs),
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Gen(args) => gen::run(args).await,
        Commands::Templates(args) => templates::run(args),
        Commands::Doctor(args) => doctor::run(args),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let style = OutputStyle::default();
            eprintln!("{}", style.error(&e.user_message()));
            std::process::exit(1);
        }
    }
}
