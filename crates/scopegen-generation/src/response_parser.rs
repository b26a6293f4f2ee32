//! Extraction of code snippets from raw backend output
//!
//! Backends are instructed to answer with a JSON `{title, code}` payload
//! and nothing else, but free-text output drifts. The parser runs an
//! ordered list of extraction strategies (structured, self-describing
//! output is trusted before best-effort text scraping) and stops at the
//! first success.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::GenerationError;
use crate::models::{ParseStrategy, ParsedSnippet};

const DEFAULT_TITLE: &str = "Generated Code";

// A fenced block must hold more than this many characters to count as code.
const MIN_CODE_LEN: usize = 10;

static JSON_BLOCKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("valid json-fence regex"));

static PYTHON_BLOCKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```python\s*([\s\S]*?)\s*```").expect("valid python-fence regex"));

static ANY_BLOCKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").expect("valid fence regex"));

static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("valid heading regex"));

// Accepts both the ASCII and the full-width colon after "title".
static TITLE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)title[：:]\s*(.+)").expect("valid title regex"));

#[derive(Debug, Deserialize)]
struct SnippetPayload {
    code: String,
    #[serde(default)]
    title: Option<String>,
}

type Strategy = fn(&str) -> Option<ParsedSnippet>;

/// Recovers `(code, title)` from unstructured backend responses
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    // Ordered by trust: explicit JSON fences, then the response body as
    // JSON, then raw code fences.
    const STRATEGIES: &'static [Strategy] = &[
        Self::parse_json_block,
        Self::parse_direct_json,
        Self::parse_python_block,
    ];

    /// Creates a new parser
    pub fn new() -> Self {
        Self
    }

    /// Run the strategies in order; first success wins
    ///
    /// Parsing is deterministic: identical input always yields the same
    /// snippet and strategy.
    pub fn parse(&self, response: &str) -> Result<ParsedSnippet, GenerationError> {
        Self::STRATEGIES
            .iter()
            .find_map(|strategy| strategy(response))
            .map(|snippet| {
                debug!(strategy = ?snippet.strategy, "extracted code from response");
                snippet
            })
            .ok_or_else(|| {
                GenerationError::ResponseParseFailed(
                    "no extraction strategy matched the response".to_string(),
                )
            })
    }

    fn parse_json_block(response: &str) -> Option<ParsedSnippet> {
        for capture in JSON_BLOCKS.captures_iter(response) {
            let body = capture.get(1)?.as_str().trim();
            if let Ok(payload) = serde_json::from_str::<SnippetPayload>(body) {
                return Some(ParsedSnippet {
                    code: payload.code,
                    title: payload.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                    strategy: ParseStrategy::JsonBlock,
                });
            }
        }
        None
    }

    fn parse_direct_json(response: &str) -> Option<ParsedSnippet> {
        if let Ok(payload) = serde_json::from_str::<SnippetPayload>(response.trim()) {
            return Some(ParsedSnippet {
                code: payload.code,
                title: payload.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                strategy: ParseStrategy::DirectJson,
            });
        }

        // Salvage a payload buried in prose: everything between the first
        // `{` and the last `}`.
        let first = response.find('{')?;
        let last = response.rfind('}')?;
        if last <= first {
            return None;
        }

        serde_json::from_str::<SnippetPayload>(&response[first..=last])
            .ok()
            .map(|payload| ParsedSnippet {
                code: payload.code,
                title: payload.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                strategy: ParseStrategy::ExtractedJson,
            })
    }

    fn parse_python_block(response: &str) -> Option<ParsedSnippet> {
        let tagged: Vec<&str> = PYTHON_BLOCKS
            .captures_iter(response)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();

        let blocks = if tagged.is_empty() {
            ANY_BLOCKS
                .captures_iter(response)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect()
        } else {
            tagged
        };

        for block in blocks {
            let code = block.trim();
            if code.len() > MIN_CODE_LEN {
                return Some(ParsedSnippet {
                    code: code.to_string(),
                    title: Self::extract_title(response),
                    strategy: ParseStrategy::PythonBlock,
                });
            }
        }
        None
    }

    fn extract_title(response: &str) -> String {
        if let Some(capture) = HEADING_LINE.captures(response) {
            if let Some(heading) = capture.get(1) {
                return heading.as_str().trim().to_string();
            }
        }

        if let Some(capture) = TITLE_FIELD.captures(response) {
            if let Some(title) = capture.get(1) {
                return title.as_str().trim().to_string();
            }
        }

        DEFAULT_TITLE.to_string()
    }
}
