//! Prompt construction for backend generation
//!
//! Builds the system/user message pair sent to a generation backend when
//! no corpus template matches. The backend is instructed to answer with
//! a JSON `{title, code}` payload and nothing else; the response parser
//! copes when it does not comply.

use serde::{Deserialize, Serialize};

use crate::models::ComplexityTier;

/// Prompt ready to send to a generation backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    /// System message with role and framework context
    pub system_prompt: String,
    /// User message with the request and response contract
    pub user_prompt: String,
}

/// Builds generation prompts with tier-specific length guides
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Creates a new prompt builder
    pub fn new() -> Self {
        Self
    }

    /// Build the prompt for a query at a complexity tier
    pub fn build(&self, query: &str, tier: ComplexityTier) -> GeneratedPrompt {
        let system_prompt = "You are an AgentScope framework code generator. \
Generate runnable Python code that uses the AgentScope standard API."
            .to_string();

        let user_prompt = format!(
            "Generate Python code for: {query}\n\
             \n\
             Requirements:\n\
             - Use the AgentScope standard API\n\
             - Code length: {guide}\n\
             - Include necessary imports\n\
             - Add brief comments for key steps\n\
             - NO markdown formatting in code\n\
             - Use simple, clear naming\n\
             \n\
             Return ONLY JSON format:\n\
             {{\n\
             \x20 \"title\": \"Code title\",\n\
             \x20 \"code\": \"Complete Python code here\"\n\
             }}\n\
             \n\
             Do not include any explanation outside the JSON.",
            query = query,
            guide = tier.guide(),
        );

        GeneratedPrompt {
            system_prompt,
            user_prompt,
        }
    }
}
