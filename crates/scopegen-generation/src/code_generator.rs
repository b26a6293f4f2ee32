//! Progressive snippet generation
//!
//! Tries the pre-authored template corpus first; falls back to a remote
//! generation backend when one is configured. Every terminal path yields
//! a well-formed [`GeneratedResult`]: per-request failures are data,
//! not errors, and nothing escapes [`CodeGenerator::generate`].

use std::path::Path;
use std::sync::Arc;

use scopegen_providers::{ChatRequest, Message, Provider};
use tracing::{debug, error, info};

use crate::code_validator::CodeValidator;
use crate::error::GenerationError;
use crate::models::{ComplexityTier, GeneratedResult, Provenance, ValidationReport};
use crate::prompt_builder::PromptBuilder;
use crate::response_parser::ResponseParser;
use crate::templates::{TemplateInfo, TemplateRetriever};

/// Backend call parameters
#[derive(Debug, Clone)]
pub struct CodeGeneratorConfig {
    /// Model identifier sent to the backend
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: usize,
}

impl Default for CodeGeneratorConfig {
    fn default() -> Self {
        Self {
            model: "qwen-max".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

/// Progressive code generator for AgentScope snippets
pub struct CodeGenerator {
    retriever: TemplateRetriever,
    parser: ResponseParser,
    validator: CodeValidator,
    prompt_builder: PromptBuilder,
    provider: Option<Arc<dyn Provider>>,
    config: CodeGeneratorConfig,
}

impl CodeGenerator {
    /// Create a generator over the corpus at `corpus_root`, with no
    /// backend configured
    pub fn new(corpus_root: impl AsRef<Path>) -> Result<Self, GenerationError> {
        Ok(Self {
            retriever: TemplateRetriever::load(corpus_root)?,
            parser: ResponseParser::new(),
            validator: CodeValidator::new(),
            prompt_builder: PromptBuilder::new(),
            provider: None,
            config: CodeGeneratorConfig::default(),
        })
    }

    /// Attach a generation backend for queries no template covers
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override the backend call parameters
    pub fn with_config(mut self, config: CodeGeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether a generation backend is configured
    pub fn has_backend(&self) -> bool {
        self.provider.is_some()
    }

    /// All templates in the loaded corpus
    pub fn list_templates(&self) -> Vec<&TemplateInfo> {
        let mut templates: Vec<_> = self.retriever.templates().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Generate a snippet for a free-text query at a complexity tier
    ///
    /// Template artifacts are authored-and-reviewed and returned without
    /// re-validation; backend output is parsed and validated, and the
    /// result carries the full report whether or not it is valid. The
    /// single await point is the backend call; there is no retry, that
    /// policy belongs to the caller.
    pub async fn generate(&self, query: &str, tier: ComplexityTier) -> GeneratedResult {
        if let Some(template) = self.retriever.match_query(query) {
            if let Some(code) = self.retriever.artifact(&template.id, tier) {
                info!(template = %template.id, %tier, "serving template artifact");
                return GeneratedResult {
                    code,
                    title: template.title.clone(),
                    tier,
                    provenance: Provenance::Template,
                    validation: None,
                };
            }
            debug!(template = %template.id, %tier, "matched template lacks tier artifact");
        }

        let Some(provider) = &self.provider else {
            return GeneratedResult {
                code: String::new(),
                title: "Not Available".to_string(),
                tier,
                provenance: Provenance::None,
                validation: Some(ValidationReport::failed(
                    "No matching template and no generation backend configured",
                )),
            };
        };

        let prompt = self.prompt_builder.build(query, tier);
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message::system(prompt.system_prompt),
                Message::user(prompt.user_prompt),
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
        };

        debug!(provider = provider.id(), model = %self.config.model, "requesting backend generation");

        let response = match provider.chat(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(provider = provider.id(), "backend generation failed: {}", e);
                return GeneratedResult {
                    code: String::new(),
                    title: "Generation Failed".to_string(),
                    tier,
                    provenance: Provenance::GenerationService,
                    validation: Some(ValidationReport::failed(e.to_string())),
                };
            }
        };

        let snippet = match self.parser.parse(&response.content) {
            Ok(snippet) => snippet,
            Err(e) => {
                return GeneratedResult {
                    code: String::new(),
                    title: "Generation Failed".to_string(),
                    tier,
                    provenance: Provenance::GenerationService,
                    validation: Some(ValidationReport::failed(e.to_string())),
                };
            }
        };

        let report = self.validator.validate_complete(&snippet.code);
        debug!(strategy = ?snippet.strategy, valid = report.is_valid, "backend snippet validated");

        GeneratedResult {
            code: snippet.code,
            title: snippet.title,
            tier,
            provenance: Provenance::GenerationService,
            validation: Some(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scopegen_providers::{ChatResponse, FinishReason, ProviderError, TokenUsage};
    use std::fs;
    use tempfile::TempDir;

    struct CannedProvider {
        reply: Result<String, ProviderError>,
    }

    #[async_trait]
    impl Provider for CannedProvider {
        fn id(&self) -> &str {
            "canned"
        }

        fn name(&self) -> &str {
            "Canned"
        }

        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            self.reply.clone().map(|content| ChatResponse {
                content,
                model: request.model,
                usage: TokenUsage::default(),
                finish_reason: FinishReason::Stop,
            })
        }
    }

    fn corpus() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("metadata_index.json"),
            r#"{
                "templates": [
                    {
                        "id": "react_agent",
                        "category": "agents",
                        "title": "ReAct Agent with Tools",
                        "keywords": ["react", "agent", "tools"]
                    }
                ]
            }"#,
        )
        .unwrap();

        let tpl = dir.path().join("agents").join("react_agent");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(tpl.join("concise.py"), "import agentscope\nagentscope.init()\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_template_hit_skips_validation() {
        let dir = corpus();
        let generator = CodeGenerator::new(dir.path()).unwrap();

        let result = generator
            .generate("create a ReActAgent with tools", ComplexityTier::Concise)
            .await;

        assert_eq!(result.provenance, Provenance::Template);
        assert_eq!(result.title, "ReAct Agent with Tools");
        assert_eq!(result.code, "import agentscope\nagentscope.init()\n");
        assert!(result.validation.is_none());
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn test_miss_without_backend_is_unavailable() {
        let dir = corpus();
        let generator = CodeGenerator::new(dir.path()).unwrap();
        assert!(!generator.has_backend());

        let result = generator
            .generate("xyzabc123 nonexistent widget", ComplexityTier::Concise)
            .await;

        assert_eq!(result.provenance, Provenance::None);
        assert_eq!(result.title, "Not Available");
        assert!(result.code.is_empty());
        assert!(!result.is_valid());
    }

    #[tokio::test]
    async fn test_tier_miss_without_backend_is_unavailable() {
        let dir = corpus();
        let generator = CodeGenerator::new(dir.path()).unwrap();

        // Template matches but only ships a concise artifact.
        let result = generator
            .generate("create a ReActAgent with tools", ComplexityTier::Complete)
            .await;

        assert_eq!(result.provenance, Provenance::None);
        assert!(!result.is_valid());
    }

    #[tokio::test]
    async fn test_backend_json_payload_is_parsed_and_validated() {
        let dir = corpus();
        let reply = "```json\n{\"code\": \"import agentscope\\nagentscope.init()\\n\\ndef main() -> None:\\n    pass\", \"title\": \"Demo\"}\n```";
        let generator = CodeGenerator::new(dir.path()).unwrap().with_provider(Arc::new(
            CannedProvider {
                reply: Ok(reply.to_string()),
            },
        ));

        let result = generator
            .generate("no keywords overlap here", ComplexityTier::Minimal)
            .await;

        assert_eq!(result.provenance, Provenance::GenerationService);
        assert_eq!(result.title, "Demo");
        let report = result.validation.as_ref().unwrap();
        assert!(report.is_valid);
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn test_backend_error_becomes_failed_result() {
        let dir = corpus();
        let generator = CodeGenerator::new(dir.path()).unwrap().with_provider(Arc::new(
            CannedProvider {
                reply: Err(ProviderError::NetworkError("connection refused".to_string())),
            },
        ));

        let result = generator
            .generate("no keywords overlap here", ComplexityTier::Concise)
            .await;

        assert_eq!(result.provenance, Provenance::GenerationService);
        assert_eq!(result.title, "Generation Failed");
        assert!(!result.is_valid());
        let report = result.validation.unwrap();
        assert!(report.errors[0].contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unparseable_backend_output_becomes_failed_result() {
        let dir = corpus();
        let generator = CodeGenerator::new(dir.path()).unwrap().with_provider(Arc::new(
            CannedProvider {
                reply: Ok("sorry, I have no code for you".to_string()),
            },
        ));

        let result = generator
            .generate("no keywords overlap here", ComplexityTier::Concise)
            .await;

        assert_eq!(result.provenance, Provenance::GenerationService);
        assert!(!result.is_valid());
        let report = result.validation.unwrap();
        assert!(report.errors[0].contains("extract code"));
    }

    #[tokio::test]
    async fn test_invalid_backend_code_is_returned_with_report() {
        let dir = corpus();
        // Parses fine but misses both convention markers.
        let reply = r#"{"code": "x = 1\nprint(x)", "title": "Bare"}"#;
        let generator = CodeGenerator::new(dir.path()).unwrap().with_provider(Arc::new(
            CannedProvider {
                reply: Ok(reply.to_string()),
            },
        ));

        let result = generator
            .generate("no keywords overlap here", ComplexityTier::Concise)
            .await;

        assert_eq!(result.provenance, Provenance::GenerationService);
        assert_eq!(result.code, "x = 1\nprint(x)");
        assert!(!result.is_valid());
    }
}
