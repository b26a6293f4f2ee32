//! End-to-end tests for the progressive generation pipeline
//!
//! Exercises the full flow across crates: corpus retrieval, backend
//! fallback through a stub provider, response parsing, and validation.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use scopegen_generation::{
    CheckOutcome, CodeGenerator, CodeGeneratorConfig, ComplexityTier, Provenance,
};
use scopegen_providers::{ChatRequest, ChatResponse, FinishReason, Provider, ProviderError, TokenUsage};
use tempfile::TempDir;

/// Stub backend returning a canned reply, recording nothing
struct StubProvider {
    reply: Result<String, ProviderError>,
}

#[async_trait]
impl Provider for StubProvider {
    fn id(&self) -> &str {
        "stub"
    }

    fn name(&self) -> &str {
        "Stub"
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

fn write_corpus(root: &Path) {
    fs::write(
        root.join("metadata_index.json"),
        r#"{
            "templates": [
                {
                    "id": "react_agent",
                    "category": "agents",
                    "title": "ReAct Agent with Tools",
                    "keywords": ["react", "agent", "tools"]
                },
                {
                    "id": "basic_chat_agent",
                    "category": "agents",
                    "title": "Basic Chat Agent",
                    "keywords": ["chat", "agent", "conversation"]
                }
            ]
        }"#,
    )
    .unwrap();

    let react = root.join("agents").join("react_agent");
    fs::create_dir_all(&react).unwrap();
    fs::write(
        react.join("concise.py"),
        "import agentscope\nagentscope.init()\n\ndef main() -> None:\n    pass\n",
    )
    .unwrap();
    fs::write(react.join("minimal.py"), "import agentscope\nagentscope.init()\n").unwrap();
}

#[tokio::test]
async fn test_template_hit_serves_concise_artifact_untouched() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let generator = CodeGenerator::new(dir.path()).unwrap();

    let result = generator
        .generate("create a ReActAgent with tools", ComplexityTier::Concise)
        .await;

    assert_eq!(result.provenance, Provenance::Template);
    assert_eq!(result.title, "ReAct Agent with Tools");
    assert_eq!(
        result.code,
        "import agentscope\nagentscope.init()\n\ndef main() -> None:\n    pass\n"
    );
    assert!(result.validation.is_none());
    assert_eq!(result.tier, ComplexityTier::Concise);
}

#[tokio::test]
async fn test_unmatched_query_without_backend() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let generator = CodeGenerator::new(dir.path()).unwrap();

    let result = generator
        .generate("xyzabc123 nonexistent widget", ComplexityTier::Concise)
        .await;

    assert_eq!(result.provenance, Provenance::None);
    assert!(result.code.is_empty());
    assert!(!result.is_valid());
    let report = result.validation.unwrap();
    assert!(report.syntax.is_none());
    assert!(report.errors[0].contains("no generation backend"));
}

#[tokio::test]
async fn test_backend_fallback_with_fenced_json() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());

    let reply = "```json\n{\"code\": \"import agentscope\\nagentscope.init()\\n\\ndef main() -> None:\\n    print(1)\", \"title\": \"Demo\"}\n```";
    let generator = CodeGenerator::new(dir.path())
        .unwrap()
        .with_provider(Arc::new(StubProvider {
            reply: Ok(reply.to_string()),
        }))
        .with_config(CodeGeneratorConfig::default());

    let result = generator
        .generate("completely unrelated request", ComplexityTier::Minimal)
        .await;

    assert_eq!(result.provenance, Provenance::GenerationService);
    assert_eq!(result.title, "Demo");

    let report = result.validation.unwrap();
    assert!(report.is_valid);
    assert_eq!(report.syntax, Some(CheckOutcome::Pass));
    assert_eq!(report.safety, Some(CheckOutcome::Pass));
    assert_eq!(report.conventions, Some(CheckOutcome::Pass));
}

#[tokio::test]
async fn test_backend_code_missing_init_marker_fails_conventions() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());

    let reply = r#"{"code": "import agentscope\n\ndef main() -> None:\n    pass", "title": "No Init"}"#;
    let generator = CodeGenerator::new(dir.path())
        .unwrap()
        .with_provider(Arc::new(StubProvider {
            reply: Ok(reply.to_string()),
        }));

    let result = generator
        .generate("completely unrelated request", ComplexityTier::Concise)
        .await;

    let report = result.validation.unwrap();
    assert_eq!(report.syntax, Some(CheckOutcome::Pass));
    assert_eq!(report.safety, Some(CheckOutcome::Pass));
    assert_eq!(report.conventions, Some(CheckOutcome::Fail));
    assert!(!report.is_valid);
    assert!(report.errors.iter().any(|e| e.contains("agentscope.init")));
}

#[tokio::test]
async fn test_backend_failure_surfaces_as_failed_result() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());

    let generator = CodeGenerator::new(dir.path())
        .unwrap()
        .with_provider(Arc::new(StubProvider {
            reply: Err(ProviderError::ProviderError("DashScope API error: 500".to_string())),
        }));

    let result = generator
        .generate("completely unrelated request", ComplexityTier::Concise)
        .await;

    assert_eq!(result.provenance, Provenance::GenerationService);
    assert_eq!(result.title, "Generation Failed");
    assert!(!result.is_valid());
    assert!(result.validation.unwrap().errors[0].contains("500"));
}

#[tokio::test]
async fn test_unparseable_backend_output() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());

    let generator = CodeGenerator::new(dir.path())
        .unwrap()
        .with_provider(Arc::new(StubProvider {
            reply: Ok("Sorry, I cannot help with that.".to_string()),
        }));

    let result = generator
        .generate("completely unrelated request", ComplexityTier::Concise)
        .await;

    assert_eq!(result.provenance, Provenance::GenerationService);
    assert!(result.code.is_empty());
    assert!(!result.is_valid());
}

#[tokio::test]
async fn test_tier_fallback_to_backend_when_artifact_missing() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());

    // react_agent has no complete.py, so the matched template cannot
    // serve this tier and the backend takes over.
    let reply = r#"{"code": "import agentscope\nagentscope.init()\n\ndef main() -> None:\n    pass", "title": "Complete Build"}"#;
    let generator = CodeGenerator::new(dir.path())
        .unwrap()
        .with_provider(Arc::new(StubProvider {
            reply: Ok(reply.to_string()),
        }));

    let result = generator
        .generate("create a ReActAgent with tools", ComplexityTier::Complete)
        .await;

    assert_eq!(result.provenance, Provenance::GenerationService);
    assert_eq!(result.title, "Complete Build");
    assert!(result.is_valid());
}

#[tokio::test]
async fn test_result_serializes_with_string_tags() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let generator = CodeGenerator::new(dir.path()).unwrap();

    let result = generator
        .generate("create a ReActAgent with tools", ComplexityTier::Concise)
        .await;

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["provenance"], "template");
    assert_eq!(json["tier"], "concise");
    assert!(json.get("validation").is_none());
}
