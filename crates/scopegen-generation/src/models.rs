//! Data models for the snippet-generation pipeline

use serde::{Deserialize, Serialize};

/// Complexity tier requested for a snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    /// 15-30 lines, core concept only
    Minimal,
    /// 50-100 lines, complete runnable example
    Concise,
    /// 100-200 lines, production-ready with error handling
    Complete,
}

impl ComplexityTier {
    /// Tier name as used in corpus file names and serialized results
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityTier::Minimal => "minimal",
            ComplexityTier::Concise => "concise",
            ComplexityTier::Complete => "complete",
        }
    }

    /// Resolve a tier name, falling back to `concise` for anything
    /// unrecognized
    pub fn from_name(name: &str) -> Self {
        match name {
            "minimal" => ComplexityTier::Minimal,
            "complete" => ComplexityTier::Complete,
            _ => ComplexityTier::Concise,
        }
    }

    /// Length and style instruction embedded in generation prompts
    pub fn guide(&self) -> &'static str {
        match self {
            ComplexityTier::Minimal => "15-30 lines, core concept only",
            ComplexityTier::Concise => "50-100 lines, complete runnable example",
            ComplexityTier::Complete => "100-200 lines, production-ready with error handling",
        }
    }
}

impl Default for ComplexityTier {
    fn default() -> Self {
        ComplexityTier::Concise
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the code in a [`GeneratedResult`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Pre-authored corpus template
    Template,
    /// Remote generation backend
    GenerationService,
    /// Nothing could be produced
    None,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Provenance::Template => "template",
            Provenance::GenerationService => "generation-service",
            Provenance::None => "none",
        };
        write!(f, "{}", tag)
    }
}

/// Outcome of a single validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    /// Check ran and found nothing wrong
    Pass,
    /// Check ran and found violations
    Fail,
}

/// Multi-check validation report
///
/// A check that never ran (safety and conventions after a syntax
/// failure, or every check on a result that carries no code) is `None`,
/// not `Fail`. Absence signals the check was never meaningful to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Syntax check outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax: Option<CheckOutcome>,
    /// Safety scan outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<CheckOutcome>,
    /// Framework-convention check outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conventions: Option<CheckOutcome>,
    /// Error messages, in check order
    pub errors: Vec<String>,
    /// Advisory warnings (never affect validity)
    pub warnings: Vec<String>,
    /// Conjunction of all checks that actually ran
    pub is_valid: bool,
}

impl ValidationReport {
    /// Report for a pipeline failure that produced no code to check
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            syntax: None,
            safety: None,
            conventions: None,
            errors: vec![message.into()],
            warnings: Vec::new(),
            is_valid: false,
        }
    }
}

/// Two-state validation status used by the legacy wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// All checks passed
    Passed,
    /// At least one check failed
    Failed,
    /// Validation did not run
    Skipped,
}

/// Flattened validation result for callers that do not need the
/// per-check breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Overall status
    pub status: ValidationStatus,
    /// Human-readable summary
    pub message: String,
    /// Concatenated error detail, when failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Extraction strategy that recovered a snippet from backend output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Fenced ```json block containing a code payload
    JsonBlock,
    /// Entire response decoded as a code payload
    DirectJson,
    /// Payload extracted between the outermost braces
    ExtractedJson,
    /// Fenced ```python (or untagged) code block
    PythonBlock,
}

/// Code recovered from raw backend output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSnippet {
    /// Extracted source code
    pub code: String,
    /// Extracted or defaulted title
    pub title: String,
    /// Strategy that produced this snippet
    pub strategy: ParseStrategy,
}

/// Externally visible result of one generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedResult {
    /// Snippet source code; empty when nothing could be produced
    pub code: String,
    /// Snippet title
    pub title: String,
    /// Complexity tier that was requested
    pub tier: ComplexityTier,
    /// Where the code came from
    pub provenance: Provenance,
    /// Validation report; `None` for pre-trusted template artifacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl GeneratedResult {
    /// Whether the result is usable as-is
    ///
    /// Template artifacts carry no report and count as valid.
    pub fn is_valid(&self) -> bool {
        match &self.validation {
            Some(report) => report.is_valid,
            None => true,
        }
    }
}
