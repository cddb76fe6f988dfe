//! Entry routing and the static transition table.
//!
//! The stage graph is linear with a single conditional fork at entry, so a
//! closed transition table over `StageId` captures the whole control flow.
//! No stage re-enters an earlier one; a run makes at most
//! `1 + 1 + 1 + |search_results| + 1` stage executions.

use deepbrief_core::StageId;

/// Pick the entry stage for a run.
///
/// Context recall only makes sense when the caller asked for a follow-up AND
/// a prior record actually exists; a follow-up with no prior context degrades
/// to a fresh plan rather than failing.
pub fn select_entry(follow_up: bool, has_prior_context: bool) -> StageId {
    if follow_up && has_prior_context {
        StageId::SummarizeContext
    } else {
        StageId::Plan
    }
}

/// The fixed successor of each stage; `None` terminates the run.
pub fn next_stage(stage: StageId) -> Option<StageId> {
    match stage {
        StageId::SummarizeContext => Some(StageId::Plan),
        StageId::Plan => Some(StageId::Search),
        StageId::Search => Some(StageId::SummarizeSources),
        StageId::SummarizeSources => Some(StageId::Synthesize),
        StageId::Synthesize => None,
    }
}
