//! Template corpus: tokenization, keyword indexing, and retrieval

pub mod index;
pub mod manifest;
pub mod retriever;

pub use index::{tokenize, KeywordIndex};
pub use manifest::{load_manifest, Manifest, ManifestEntry};
pub use retriever::{TemplateInfo, TemplateRetriever};
