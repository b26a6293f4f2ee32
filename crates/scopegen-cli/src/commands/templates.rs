// List the templates in the corpus

use std::path::PathBuf;

use clap::Args;
use scopegen_generation::TemplateRetriever;

use crate::commands::resolve_templates_dir;
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Arguments for `scopegen templates`
#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Template corpus root
    #[arg(long = "templates-dir")]
    pub templates_dir: Option<PathBuf>,
}

/// Execute the templates command
pub fn run(args: TemplatesArgs) -> CliResult<i32> {
    let style = OutputStyle::default();
    let corpus_dir = resolve_templates_dir(args.templates_dir);

    let retriever =
        TemplateRetriever::load(&corpus_dir).map_err(|e| CliError::Corpus(e.to_string()))?;

    if retriever.is_empty() {
        println!("{}", style.warning("No templates found"));
        return Ok(0);
    }

    let mut templates: Vec<_> = retriever.templates().collect();
    templates.sort_by(|a, b| a.id.cmp(&b.id));

    println!("{}", style.header(&format!("{} templates", templates.len())));
    for template in templates {
        println!();
        println!("{} ({})", style.header(&template.id), template.category);
        println!("  {}", template.title);
        if !template.keywords.is_empty() {
            println!("  keywords: {}", template.keywords.join(", "));
        }
    }

    Ok(0)
}
