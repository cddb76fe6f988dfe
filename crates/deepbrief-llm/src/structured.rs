//! Structured generation with bounded retry.
//!
//! A generator that is asked for JSON will sometimes return prose, fenced
//! code blocks, reasoning tags, or JSON that parses but breaks a field
//! constraint. All of those are schema violations and get a fresh attempt
//! (with the violation fed back into the prompt); provider failures are not
//! retried here - a wrong-shaped answer is retriable, an unreachable
//! provider is not.

use crate::provider::{GenRequest, Generator, LlmError, LlmResult};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// A type the generator can be asked to produce.
///
/// Shape conformance comes from serde; `validate` enforces the constraints
/// serde cannot express (non-empty text, list length bounds).
pub trait StructuredSchema: DeserializeOwned {
    /// Schema name used in prompts and violation messages.
    fn schema_name() -> &'static str;

    fn validate(&self) -> Result<(), String>;
}

/// Extract the JSON object embedded in raw generator output.
///
/// Tolerates markdown fences, `<think>` blocks, and surrounding prose by
/// taking the span from the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Generate a `T`, retrying on schema violations up to `retry_budget`
/// attempts. Each attempt is a fresh request with `per_call_timeout` applied;
/// exhausting the budget yields `LlmError::SchemaViolation`.
pub async fn generate_structured<T: StructuredSchema>(
    generator: &dyn Generator,
    request: &GenRequest,
    retry_budget: u32,
    per_call_timeout: Duration,
) -> LlmResult<T> {
    let budget = retry_budget.max(1);
    let mut feedback: Option<String> = None;
    let mut last_violation = String::new();

    for attempt in 1..=budget {
        let mut attempt_request = request.clone();
        if let Some(violation) = &feedback {
            attempt_request.prompt.push_str(&format!(
                "\n\nYour previous response was rejected: {}.\n\
                 Respond again with ONLY a valid JSON object, no prose and no code fences.",
                violation
            ));
        }

        let raw = match tokio::time::timeout(per_call_timeout, generator.generate(attempt_request))
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(LlmError::TimedOut {
                    elapsed_ms: per_call_timeout.as_millis() as u64,
                })
            }
        };

        match parse_and_validate::<T>(&raw) {
            Ok(value) => {
                debug!("{} parsed on attempt {}/{}", T::schema_name(), attempt, budget);
                return Ok(value);
            }
            Err(violation) => {
                warn!(
                    "{} violation on attempt {}/{}: {}",
                    T::schema_name(),
                    attempt,
                    budget,
                    violation
                );
                feedback = Some(violation.clone());
                last_violation = violation;
            }
        }
    }

    Err(LlmError::SchemaViolation {
        schema: T::schema_name(),
        attempts: budget,
        message: last_violation,
    })
}

fn parse_and_validate<T: StructuredSchema>(raw: &str) -> Result<T, String> {
    let json = extract_json(raw).ok_or_else(|| "no JSON object in response".to_string())?;
    let value: T = serde_json::from_str(json).map_err(|e| e.to_string())?;
    value.validate()?;
    Ok(value)
}
