//! Run state - exclusively owned by the engine for the duration of one run.
//!
//! Fields only move forward: each stage appends or sets fields its
//! predecessors left empty, and no stage clears anything set before it.

use deepbrief_core::{
    BriefRequest, FinalBrief, Identity, ResearchPlan, SearchDepth, SearchResult, SourceSummary,
};
use uuid::Uuid;

#[derive(Debug)]
pub struct RunState {
    pub run_id: Uuid,
    pub identity: Identity,
    pub topic: String,
    pub follow_up: bool,
    pub search_depth: SearchDepth,

    /// Condensed prior-brief context; present only for follow-ups whose
    /// recall succeeded.
    pub recalled_context: Option<String>,
    pub plan: Option<ResearchPlan>,
    pub search_results: Vec<SearchResult>,
    pub source_summaries: Vec<SourceSummary>,
    /// Set by the synthesize stage; once present the run is terminal.
    pub brief: Option<FinalBrief>,
}

impl RunState {
    pub fn new(request: &BriefRequest) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            identity: request.identity.clone(),
            topic: request.topic.clone(),
            follow_up: request.follow_up,
            search_depth: request.search_depth,
            recalled_context: None,
            plan: None,
            search_results: Vec::new(),
            source_summaries: Vec::new(),
            brief: None,
        }
    }
}
