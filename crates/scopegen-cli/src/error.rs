// CLI-specific errors

use thiserror::Error;

/// Errors surfaced at the CLI boundary
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

impl CliError {
    /// User-friendly message with a next step where one exists
    pub fn user_message(&self) -> String {
        match self {
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Corpus(msg) => format!(
                "Template corpus could not be loaded: {}\n\nCheck --templates-dir or SCOPEGEN_TEMPLATES_DIR.",
                msg
            ),
            CliError::Provider(msg) => format!(
                "Generation backend misconfigured: {}\n\nCheck DASHSCOPE_API_KEY.",
                msg
            ),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
