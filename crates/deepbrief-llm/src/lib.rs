//! Deepbrief LLM - generator adapters and structured output validation

pub mod groq;
pub mod provider;
pub mod schemas;
pub mod structured;

pub use groq::GroqProvider;
pub use provider::{GenRequest, Generator, LlmError, LlmResult, Tier};
pub use schemas::SynthesisDraft;
pub use structured::{extract_json, generate_structured, StructuredSchema};
