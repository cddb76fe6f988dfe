//! Core types for Deepbrief

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Caller identifier - cheaply cloneable
///
/// Opaque key distinguishing independent callers/conversations for context
/// continuity. One identity maps to at most one stored prior brief.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Identity(Arc<str>);

impl Identity {
    pub fn new(s: impl Into<String>) -> Self {
        Self(Arc::from(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Serialize for Identity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(s))
    }
}

/// Search depth, forwarded opaquely to the search provider
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound request for a research brief
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BriefRequest {
    pub identity: Identity,
    pub topic: String,
    #[serde(default)]
    pub follow_up: bool,
    #[serde(default)]
    pub search_depth: SearchDepth,
}

impl BriefRequest {
    pub fn new(identity: impl Into<Identity>, topic: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            topic: topic.into(),
            follow_up: false,
            search_depth: SearchDepth::Basic,
        }
    }

    pub fn follow_up(mut self) -> Self {
        self.follow_up = true;
        self
    }

    pub fn with_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }
}

/// One step of a research plan: a question and the query that answers it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanStep {
    pub question: String,
    pub search_query: String,
}

/// The structured plan the pipeline follows to research a topic
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub topic: String,
    pub steps: Vec<PlanStep>,
}

impl ResearchPlan {
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.search_query.as_str())
    }
}

/// A single result from the search provider
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Structured summary of one information source.
///
/// `degraded` marks a source that could not be fetched or summarized; such a
/// summary carries empty `key_points` and is never silently dropped, so the
/// final brief's references always line up one-to-one with the search results.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceSummary {
    pub url: String,
    pub title: String,
    pub key_points: Vec<String>,
    pub relevance_to_topic: String,
    #[serde(default)]
    pub degraded: bool,
}

impl SourceSummary {
    /// Placeholder summary for a source whose summarization failed.
    pub fn degraded(
        url: impl Into<String>,
        title: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            key_points: Vec::new(),
            relevance_to_topic: reason.into(),
            degraded: true,
        }
    }
}

/// The final, user-facing research brief
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalBrief {
    pub topic: String,
    pub introduction: String,
    pub synthesis: String,
    pub references: Vec<SourceSummary>,
    pub potential_follow_ups: Vec<String>,
}

impl FinalBrief {
    /// Render the brief as markdown, the shape the CLI prints.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("## Research Brief: {}\n\n", self.topic));
        out.push_str("### Introduction\n\n");
        out.push_str(&self.introduction);
        out.push_str("\n\n### Synthesis\n\n");
        out.push_str(&self.synthesis);
        out.push_str("\n\n### Potential Follow-up Questions\n\n");
        for (i, question) in self.potential_follow_ups.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, question));
        }
        out.push_str("\n### References\n\n");
        for (i, reference) in self.references.iter().enumerate() {
            out.push_str(&format!("{}. [{}]({})", i + 1, reference.title, reference.url));
            if reference.degraded {
                out.push_str(" *(unavailable)*");
            }
            out.push('\n');
        }
        out
    }
}

/// The single live context record for one identity (last-write-wins)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextRecord {
    pub identity: Identity,
    pub last_brief: FinalBrief,
    pub updated_at: DateTime<Utc>,
}

impl ContextRecord {
    pub fn new(identity: Identity, last_brief: FinalBrief) -> Self {
        Self {
            identity,
            last_brief,
            updated_at: Utc::now(),
        }
    }
}
