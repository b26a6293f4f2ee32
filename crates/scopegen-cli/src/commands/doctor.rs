// Check whether dynamic generation is available

use std::path::PathBuf;

use clap::Args;
use scopegen_generation::TemplateRetriever;
use scopegen_providers::DashScopeProvider;

use crate::commands::resolve_templates_dir;
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Arguments for `scopegen doctor`
#[derive(Debug, Args)]
pub struct DoctorArgs {
    /// Template corpus root
    #[arg(long = "templates-dir")]
    pub templates_dir: Option<PathBuf>,
}

/// Execute the doctor command, returning the process exit code
pub fn run(args: DoctorArgs) -> CliResult<i32> {
    let style = OutputStyle::default();
    let corpus_dir = resolve_templates_dir(args.templates_dir);
    let mut all_ok = true;

    match TemplateRetriever::load(&corpus_dir) {
        Ok(retriever) if !retriever.is_empty() => {
            println!(
                "{}",
                style.success(&format!(
                    "{} templates loaded from {}",
                    retriever.len(),
                    corpus_dir.display()
                ))
            );
        }
        Ok(_) => {
            println!(
                "{}",
                style.error(&format!("no templates found in {}", corpus_dir.display()))
            );
            all_ok = false;
        }
        Err(e) => {
            println!("{}", style.error(&format!("corpus failed to load: {}", e)));
            all_ok = false;
        }
    }

    match DashScopeProvider::from_env() {
        Ok(Some(_)) => {
            println!("{}", style.success("DASHSCOPE_API_KEY configured"));
        }
        Ok(None) => {
            println!(
                "{}",
                style.error("DASHSCOPE_API_KEY not set (backend generation unavailable)")
            );
            all_ok = false;
        }
        Err(e) => {
            println!("{}", style.error(&format!("backend misconfigured: {}", e)));
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("Dynamic generation: ENABLED");
        Ok(0)
    } else {
        println!("Dynamic generation: DISABLED (static templates only)");
        Ok(1)
    }
}
