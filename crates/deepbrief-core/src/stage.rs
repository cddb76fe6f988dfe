//! Stage identifiers for the research pipeline.
//!
//! The pipeline is a closed set of stages with a statically known order;
//! carrying the identifier as a tagged variant (rather than a string) keeps
//! the transition table and error reporting total over the stage set.

use serde::{Deserialize, Serialize};

/// One named step of the research pipeline.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    /// Condense the caller's prior brief into recall context (follow-ups only).
    SummarizeContext,
    /// Produce the research plan: questions and search queries.
    Plan,
    /// Run the plan's queries against the search provider.
    Search,
    /// Summarize each search result into a structured source summary.
    SummarizeSources,
    /// Synthesize the final brief from the source summaries.
    Synthesize,
}

impl StageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::SummarizeContext => "summarize-context",
            StageId::Plan => "plan",
            StageId::Search => "search",
            StageId::SummarizeSources => "summarize-sources",
            StageId::Synthesize => "synthesize",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
