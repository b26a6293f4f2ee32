#![warn(missing_docs)]

//! Progressive code generation for the AgentScope framework
//!
//! Given a free-text request, produces a runnable Python snippet plus
//! metadata describing how it was produced and whether it is trustworthy.
//! Pre-authored corpus templates are served first; a remote generation
//! backend is the fallback, with its free-text output recovered by a
//! multi-strategy parser and vetted by a tiered validator before the
//! result is handed back.

pub mod code_generator;
pub mod code_validator;
pub mod error;
pub mod models;
pub mod prompt_builder;
pub mod response_parser;
pub mod templates;

// Re-export public API
pub use code_generator::{CodeGenerator, CodeGeneratorConfig};
pub use code_validator::CodeValidator;
pub use error::GenerationError;
pub use models::{
    CheckOutcome, ComplexityTier, GeneratedResult, ParseStrategy, ParsedSnippet, Provenance,
    ValidationOutcome, ValidationReport, ValidationStatus,
};
pub use prompt_builder::{GeneratedPrompt, PromptBuilder};
pub use response_parser::ResponseParser;
pub use templates::{tokenize, KeywordIndex, TemplateInfo, TemplateRetriever};
