//! Keyword-based template retrieval

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::models::ComplexityTier;
use crate::templates::index::{tokenize, KeywordIndex};
use crate::templates::manifest::load_manifest;

/// Metadata for one corpus template
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    /// Template identifier
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Category directory
    pub category: String,
    /// Declared keywords
    pub keywords: Vec<String>,
    dir: PathBuf,
}

impl TemplateInfo {
    /// On-disk path of the artifact for a tier
    pub fn artifact_path(&self, tier: ComplexityTier) -> PathBuf {
        self.dir.join(format!("{}.py", tier.as_str()))
    }
}

/// Matches free-text queries against the template corpus
///
/// The keyword index and template table are built once at [`load`] time
/// and never mutated, so a retriever can be shared by reference across
/// concurrent requests without locking.
///
/// [`load`]: TemplateRetriever::load
#[derive(Debug)]
pub struct TemplateRetriever {
    templates: HashMap<String, TemplateInfo>,
    index: KeywordIndex,
}

impl TemplateRetriever {
    /// Load the corpus under `corpus_root` and build the keyword index
    pub fn load(corpus_root: impl AsRef<Path>) -> Result<Self, GenerationError> {
        let corpus_root = corpus_root.as_ref();
        let manifest = load_manifest(corpus_root)?;

        let mut templates = HashMap::new();
        let mut index = KeywordIndex::new();

        for entry in manifest.templates {
            for keyword in &entry.keywords {
                index.insert(keyword, &entry.id);
            }

            let dir = corpus_root.join(&entry.category).join(&entry.id);
            templates.insert(
                entry.id.clone(),
                TemplateInfo {
                    id: entry.id,
                    title: entry.title,
                    category: entry.category,
                    keywords: entry.keywords,
                    dir,
                },
            );
        }

        debug!(
            templates = templates.len(),
            keywords = index.len(),
            "template corpus loaded"
        );

        Ok(Self { templates, index })
    }

    /// Match a query against the corpus
    ///
    /// Every query token found in the index adds one point to each
    /// template on its posting list; a template scores at most once per
    /// distinct matching token. The highest-scoring template wins,
    /// requiring at least one point. Equal scores resolve
    /// deterministically to the lexicographically smallest template id.
    pub fn match_query(&self, query: &str) -> Option<&TemplateInfo> {
        let mut scores: HashMap<&str, usize> = HashMap::new();
        for token in tokenize(query) {
            if let Some(ids) = self.index.postings(&token) {
                for id in ids {
                    *scores.entry(id.as_str()).or_insert(0) += 1;
                }
            }
        }

        let (best_id, score) = scores
            .into_iter()
            .max_by_key(|&(id, score)| (score, Reverse(id)))?;

        if score >= 1 {
            self.templates.get(best_id)
        } else {
            None
        }
    }

    /// Read the artifact for a template and tier
    ///
    /// An absent tier file is a normal miss, not an error. A file that
    /// exists but cannot be read is logged and treated as a miss.
    pub fn artifact(&self, template_id: &str, tier: ComplexityTier) -> Option<String> {
        let info = self.templates.get(template_id)?;
        let path = info.artifact_path(tier);

        if !path.exists() {
            debug!(template = template_id, tier = %tier, "no artifact for tier");
            return None;
        }

        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(path = %path.display(), "failed to read template artifact: {}", e);
                None
            }
        }
    }

    /// Look up a template by id
    pub fn get(&self, template_id: &str) -> Option<&TemplateInfo> {
        self.templates.get(template_id)
    }

    /// Iterate over all loaded templates
    pub fn templates(&self) -> impl Iterator<Item = &TemplateInfo> {
        self.templates.values()
    }

    /// Number of loaded templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
