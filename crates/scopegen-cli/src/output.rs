// Output formatting and styling

use colored::Colorize;
use scopegen_generation::{CheckOutcome, GeneratedResult};

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }
}

fn outcome_tag(outcome: CheckOutcome) -> &'static str {
    match outcome {
        CheckOutcome::Pass => "pass",
        CheckOutcome::Fail => "fail",
    }
}

/// Render a result as a human-readable report
///
/// Title header, then a bullet list of only the non-empty attributes,
/// then numbered errors when any.
pub fn render_report(result: &GeneratedResult, style: &OutputStyle) -> String {
    let mut lines = vec![style.header(&result.title), String::new()];

    lines.push(format!("- provenance: {}", result.provenance));
    lines.push(format!("- tier: {}", result.tier));

    if let Some(report) = &result.validation {
        lines.push(format!(
            "- valid: {}",
            if report.is_valid { "yes" } else { "no" }
        ));
        if let Some(outcome) = report.syntax {
            lines.push(format!("- syntax: {}", outcome_tag(outcome)));
        }
        if let Some(outcome) = report.safety {
            lines.push(format!("- safety: {}", outcome_tag(outcome)));
        }
        if let Some(outcome) = report.conventions {
            lines.push(format!("- conventions: {}", outcome_tag(outcome)));
        }

        if !report.errors.is_empty() {
            lines.push(String::new());
            lines.push("Errors:".to_string());
            for (i, error) in report.errors.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, error));
            }
        }

        if !report.warnings.is_empty() {
            lines.push(String::new());
            for warning in &report.warnings {
                lines.push(style.warning(warning));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopegen_generation::{ComplexityTier, Provenance, ValidationReport};

    fn plain() -> OutputStyle {
        OutputStyle { use_colors: false }
    }

    #[test]
    fn test_report_template_result_has_no_check_lines() {
        let result = GeneratedResult {
            code: "import agentscope".to_string(),
            title: "ReAct Agent".to_string(),
            tier: ComplexityTier::Concise,
            provenance: Provenance::Template,
            validation: None,
        };

        let report = render_report(&result, &plain());
        assert!(report.contains("ReAct Agent"));
        assert!(report.contains("- provenance: template"));
        assert!(report.contains("- tier: concise"));
        assert!(!report.contains("syntax"));
        assert!(!report.contains("Errors:"));
    }

    #[test]
    fn test_report_failed_result_lists_errors() {
        let result = GeneratedResult {
            code: String::new(),
            title: "Not Available".to_string(),
            tier: ComplexityTier::Minimal,
            provenance: Provenance::None,
            validation: Some(ValidationReport::failed("nothing matched")),
        };

        let report = render_report(&result, &plain());
        assert!(report.contains("- provenance: none"));
        assert!(report.contains("- valid: no"));
        assert!(report.contains("  1. nothing matched"));
        // Checks never ran, so no per-check lines appear.
        assert!(!report.contains("- syntax:"));
    }

    #[test]
    fn test_style_plain_markers() {
        let style = plain();
        assert_eq!(style.success("ok"), "✓ ok");
        assert_eq!(style.error("bad"), "✗ bad");
        assert_eq!(style.warning("hm"), "⚠ hm");
    }
}
