#![warn(missing_docs)]

//! Generation backend abstraction for scopegen
//!
//! Defines the [`Provider`] trait that the code-generation pipeline calls
//! through, the request/response models exchanged with a backend, and the
//! shipped [`DashScopeProvider`] implementation for Alibaba's DashScope
//! service.

pub mod dashscope;
pub mod error;
pub mod models;
pub mod provider;

pub use dashscope::DashScopeProvider;
pub use error::ProviderError;
pub use models::{ChatRequest, ChatResponse, FinishReason, Message, TokenUsage};
pub use provider::Provider;
