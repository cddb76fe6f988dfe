//! Schema constraints for generator-produced artifacts.
//!
//! Three artifacts come back from the generator as JSON: the research plan,
//! each source summary, and the synthesis draft. Their field constraints
//! live here so every call site retries against the same rules.

use crate::structured::StructuredSchema;
use deepbrief_core::{ResearchPlan, SourceSummary};
use serde::{Deserialize, Serialize};

/// Plans carry between 3 and 6 steps.
pub const PLAN_MIN_STEPS: usize = 3;
pub const PLAN_MAX_STEPS: usize = 6;

/// A brief suggests at most 5 follow-up questions.
pub const MAX_FOLLOW_UPS: usize = 5;

impl StructuredSchema for ResearchPlan {
    fn schema_name() -> &'static str {
        "ResearchPlan"
    }

    fn validate(&self) -> Result<(), String> {
        if self.topic.trim().is_empty() {
            return Err("topic is empty".into());
        }
        if self.steps.len() < PLAN_MIN_STEPS || self.steps.len() > PLAN_MAX_STEPS {
            return Err(format!(
                "expected {}-{} steps, got {}",
                PLAN_MIN_STEPS,
                PLAN_MAX_STEPS,
                self.steps.len()
            ));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if step.question.trim().is_empty() {
                return Err(format!("step {} has an empty question", i + 1));
            }
            if step.search_query.trim().is_empty() {
                return Err(format!("step {} has an empty search_query", i + 1));
            }
        }
        Ok(())
    }
}

impl StructuredSchema for SourceSummary {
    fn schema_name() -> &'static str {
        "SourceSummary"
    }

    fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("url is empty".into());
        }
        if self.key_points.is_empty() {
            return Err("key_points is empty".into());
        }
        if self.key_points.iter().any(|p| p.trim().is_empty()) {
            return Err("key_points contains an empty entry".into());
        }
        if self.relevance_to_topic.trim().is_empty() {
            return Err("relevance_to_topic is empty".into());
        }
        if self.degraded {
            return Err("degraded must not be set by the generator".into());
        }
        Ok(())
    }
}

/// Generator-facing shape of the final brief.
///
/// References are deliberately absent: the engine fills them from the source
/// summaries in processing order, so a brief can never cite a url the search
/// stage did not produce.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthesisDraft {
    pub introduction: String,
    pub synthesis: String,
    pub potential_follow_ups: Vec<String>,
}

impl StructuredSchema for SynthesisDraft {
    fn schema_name() -> &'static str {
        "SynthesisDraft"
    }

    fn validate(&self) -> Result<(), String> {
        if self.introduction.trim().is_empty() {
            return Err("introduction is empty".into());
        }
        if self.synthesis.trim().is_empty() {
            return Err("synthesis is empty".into());
        }
        if self.potential_follow_ups.is_empty() || self.potential_follow_ups.len() > MAX_FOLLOW_UPS
        {
            return Err(format!(
                "expected 1-{} potential_follow_ups, got {}",
                MAX_FOLLOW_UPS,
                self.potential_follow_ups.len()
            ));
        }
        if self.potential_follow_ups.iter().any(|q| q.trim().is_empty()) {
            return Err("potential_follow_ups contains an empty entry".into());
        }
        Ok(())
    }
}
