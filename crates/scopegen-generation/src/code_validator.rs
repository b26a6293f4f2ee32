//! Validation of generated snippets before they are trusted
//!
//! Three ordered checks: a structural syntax parse, a scan for dangerous
//! operations, and a check for the framework-initialization idioms
//! AgentScope snippets must carry. A syntax failure aborts the remaining
//! checks, since a snippet that does not parse cannot be meaningfully
//! safety- or convention-checked.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::{CheckOutcome, ValidationOutcome, ValidationReport, ValidationStatus};

// Dangerous operations generated code must never contain.
static UNSAFE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"os\.system\s*\(", "os.system"),
        (r"subprocess\.", "subprocess"),
        (r"__import__\s*\(", "__import__"),
        (r"\beval\s*\(", "eval"),
        (r"\bexec\s*\(", "exec"),
        (r"compile\s*\(", "compile"),
    ]
    .into_iter()
    .map(|(pattern, name)| (Regex::new(pattern).expect("valid unsafe pattern"), name))
    .collect()
});

// At least one type-annotated parameter in a def signature.
static TYPE_HINTED_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"def \w+\([^)]*:\s*\w+\)").expect("valid type-hint regex"));

const IMPORT_MARKER: &str = "import agentscope";
const INIT_MARKER: &str = "agentscope.init";

/// Runs the tiered validation checks over a code string
///
/// Stateless; safe to share across requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeValidator;

impl CodeValidator {
    /// Creates a new validator
    pub fn new() -> Self {
        Self
    }

    /// Execute the complete tiered validation
    ///
    /// On a syntax failure the safety and convention checks are left
    /// absent in the report: they never ran. A safety failure still lets
    /// the convention check run, so all actionable problems are reported
    /// together.
    pub fn validate_complete(&self, code: &str) -> ValidationReport {
        let mut report = ValidationReport {
            syntax: None,
            safety: None,
            conventions: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            is_valid: true,
        };

        match self.check_syntax(code) {
            Ok(()) => {
                report.syntax = Some(CheckOutcome::Pass);
                debug!("syntax check passed");
            }
            Err(message) => {
                report.syntax = Some(CheckOutcome::Fail);
                report.errors.push(message);
                report.is_valid = false;
                return report;
            }
        }

        let unsafe_found = self.scan_unsafe(code);
        if unsafe_found.is_empty() {
            report.safety = Some(CheckOutcome::Pass);
            debug!("safety check passed");
        } else {
            report.safety = Some(CheckOutcome::Fail);
            report.errors.push(format!(
                "Unsafe patterns found: {}",
                unsafe_found.join(", ")
            ));
            report.is_valid = false;
        }

        let violations = self.check_conventions(code, &mut report.warnings);
        if violations.is_empty() {
            report.conventions = Some(CheckOutcome::Pass);
            debug!("convention check passed");
        } else {
            report.conventions = Some(CheckOutcome::Fail);
            report.errors.extend(violations);
            report.is_valid = false;
        }

        report
    }

    /// Flatten the tiered report into the legacy two-state outcome
    pub fn validate(&self, code: &str) -> ValidationOutcome {
        let report = self.validate_complete(code);

        if report.is_valid {
            return ValidationOutcome {
                status: ValidationStatus::Passed,
                message: "Code validated successfully".to_string(),
                error: None,
            };
        }

        let joined = report.errors.join("; ");
        ValidationOutcome {
            status: ValidationStatus::Failed,
            message: joined.clone(),
            error: Some(joined),
        }
    }

    /// Parse the code with the Python grammar
    fn check_syntax(&self, code: &str) -> Result<(), String> {
        let mut parser = tree_sitter::Parser::new();
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| format!("Failed to load Python grammar: {}", e))?;

        let tree = parser
            .parse(code, None)
            .ok_or_else(|| "Failed to parse source".to_string())?;

        let root = tree.root_node();
        if !root.has_error() {
            return Ok(());
        }

        match Self::first_error_node(root) {
            Some(node) => {
                let line = node.start_position().row + 1;
                if node.is_missing() {
                    Err(format!(
                        "Syntax error at line {}: missing {}",
                        line,
                        node.kind()
                    ))
                } else {
                    let snippet: String = node
                        .utf8_text(code.as_bytes())
                        .unwrap_or_default()
                        .chars()
                        .take(40)
                        .collect();
                    Err(format!(
                        "Syntax error at line {}: near '{}'",
                        line,
                        snippet.trim()
                    ))
                }
            }
            None => Err("Syntax error: invalid source".to_string()),
        }
    }

    // Pre-order walk for the first error or missing node, i.e. the
    // earliest one in the document.
    fn first_error_node(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().find_map(Self::first_error_node)
    }

    /// Collect every dangerous-operation match, in pattern order
    fn scan_unsafe(&self, code: &str) -> Vec<&'static str> {
        UNSAFE_PATTERNS
            .iter()
            .filter(|(pattern, _)| pattern.is_match(code))
            .map(|(_, name)| {
                warn!(pattern = name, "unsafe pattern detected");
                *name
            })
            .collect()
    }

    /// Framework-convention violations, plus advisory warnings
    fn check_conventions(&self, code: &str, warnings: &mut Vec<String>) -> Vec<String> {
        let mut violations = Vec::new();

        if !code.contains(IMPORT_MARKER) {
            violations.push(format!(
                "Missing '{}' (add it at the top of the snippet)",
                IMPORT_MARKER
            ));
        }

        if !code.contains(INIT_MARKER) {
            violations.push(format!(
                "Missing '{}()' call (initialize with model configs before building agents)",
                INIT_MARKER
            ));
        }

        // Advisory only: plenty of small examples legitimately skip hints.
        if !TYPE_HINTED_DEF.is_match(code) && !code.contains("def main") {
            warn!("no type-annotated function signature found");
            warnings.push("Consider adding type hints for better code quality".to_string());
        }

        violations
    }
}
