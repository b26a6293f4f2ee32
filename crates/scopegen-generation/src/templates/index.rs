//! Query tokenization and the keyword inverted index

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static IDEOGRAPHIC_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]+").expect("valid ideographic regex"));

static WORD_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9_-]+").expect("valid word regex"));

// Function words in English and Chinese that carry no retrieval signal.
const STOPWORDS: &[&str] = &[
    "how", "to", "use", "the", "a", "an", "for", "with", "如何", "怎么", "使用",
];

/// Split free text into normalized keyword tokens
///
/// Ideographic runs are kept whole (those scripts are not
/// whitespace-delimited). Alphanumeric runs are lowercased; a run with an
/// internal underscore splits on underscores, otherwise a run with an
/// internal hyphen splits on hyphens, keeping only parts longer than one
/// character and dropping the unsplit form. Stopwords and single-character
/// tokens are removed last.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();

    for run in IDEOGRAPHIC_RUNS.find_iter(&lowered) {
        tokens.push(run.as_str().to_string());
    }

    for run in WORD_RUNS.find_iter(&lowered) {
        let word = run.as_str();
        if word.contains('_') {
            tokens.extend(
                word.split('_')
                    .filter(|part| part.chars().count() > 1)
                    .map(str::to_string),
            );
        } else if word.contains('-') {
            tokens.extend(
                word.split('-')
                    .filter(|part| part.chars().count() > 1)
                    .map(str::to_string),
            );
        } else {
            tokens.push(word.to_string());
        }
    }

    tokens.retain(|token| !STOPWORDS.contains(&token.as_str()) && token.chars().count() > 1);
    tokens
}

/// Inverted index from normalized keyword to template posting list
///
/// Built once when the corpus is loaded and read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct KeywordIndex {
    postings: HashMap<String, Vec<String>>,
}

impl KeywordIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a declared keyword for a template
    ///
    /// The keyword passes through the same tokenizer as queries, so a
    /// declared `react-agent` is findable by the query tokens `react` and
    /// `agent`. Duplicate postings are suppressed: a template gains at
    /// most one posting per normalized keyword.
    pub fn insert(&mut self, keyword: &str, template_id: &str) {
        for token in tokenize(keyword) {
            let list = self.postings.entry(token).or_default();
            if !list.iter().any(|id| id == template_id) {
                list.push(template_id.to_string());
            }
        }
    }

    /// Posting list for a normalized token, if any template declares it
    pub fn postings(&self, token: &str) -> Option<&[String]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    /// Number of distinct indexed keywords
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the index holds no keywords
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
