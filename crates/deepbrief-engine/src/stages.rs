//! Stage implementations.
//!
//! Each stage reads only fields its predecessors populated and writes
//! exactly its own. Failure policy per stage: context recall degrades,
//! plan/search/synthesize are fatal, per-source summarization absorbs
//! failures into degraded summaries.

use crate::engine::Engine;
use crate::prompts;
use crate::state::RunState;
use deepbrief_core::{
    ContextRecord, Error, FinalBrief, ResearchPlan, Result, SearchResult, SourceSummary, StageId,
};
use deepbrief_llm::{generate_structured, GenRequest, Generator, LlmError, SynthesisDraft};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const DEGRADED_RELEVANCE: &str =
    "This source could not be retrieved or summarized and contributed no content to the brief.";

impl Engine {
    /// Condense the prior brief into recall context. Failure here degrades
    /// to fresh planning - a follow-up is never aborted by a recall problem.
    pub(crate) async fn stage_summarize_context(
        &self,
        state: &mut RunState,
        prior: Option<&ContextRecord>,
    ) -> Result<()> {
        let Some(record) = prior else {
            return Ok(());
        };
        let request = GenRequest::fast(prompts::recall_prompt(&record.last_brief));
        match tokio::time::timeout(self.config.call_timeout, self.generator.generate(request))
            .await
        {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                info!("Run {}: recalled {} chars of prior context", state.run_id, text.len());
                state.recalled_context = Some(text);
            }
            Ok(Ok(_)) => {
                warn!("Run {}: empty recall, planning fresh", state.run_id);
            }
            Ok(Err(e)) => {
                warn!("Run {}: context recall failed, planning fresh: {}", state.run_id, e);
            }
            Err(_) => {
                warn!("Run {}: context recall timed out, planning fresh", state.run_id);
            }
        }
        Ok(())
    }

    pub(crate) async fn stage_plan(&self, state: &mut RunState) -> Result<()> {
        let request = GenRequest::smart(prompts::plan_prompt(
            &state.topic,
            state.recalled_context.as_deref(),
        ));
        let mut plan: ResearchPlan = generate_structured(
            self.generator.as_ref(),
            &request,
            self.config.retry_budget,
            self.config.call_timeout,
        )
        .await
        .map_err(|e| map_llm_error(StageId::Plan, e))?;

        // The plan answers the requested topic, whatever the generator
        // echoed back.
        plan.topic = state.topic.clone();

        info!("Run {}: plan has {} steps", state.run_id, plan.steps.len());
        state.plan = Some(plan);
        Ok(())
    }

    /// Run every plan query in order; dedup by url, first occurrence wins.
    /// Any query failure or timeout is fatal - there is no recovery point
    /// before summaries exist.
    pub(crate) async fn stage_search(&self, state: &mut RunState) -> Result<()> {
        let plan = state
            .plan
            .as_ref()
            .ok_or_else(|| Error::stage_failed(StageId::Search, "no plan to search from"))?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut results: Vec<SearchResult> = Vec::new();

        for step in &plan.steps {
            let found = tokio::time::timeout(
                self.config.call_timeout,
                self.search.search(&step.search_query, state.search_depth),
            )
            .await
            .map_err(|_| {
                Error::stage_failed(
                    StageId::Search,
                    format!("query '{}' timed out", step.search_query),
                )
            })?
            .map_err(|e| {
                Error::stage_failed(StageId::Search, format!("query '{}': {}", step.search_query, e))
            })?;

            for result in found {
                if seen.insert(result.url.clone()) {
                    results.push(result);
                }
            }
        }

        if results.is_empty() {
            return Err(Error::stage_failed(
                StageId::Search,
                "no results for any plan query",
            ));
        }

        info!("Run {}: {} unique search results", state.run_id, results.len());
        state.search_results = results;
        Ok(())
    }

    /// Summarize each result under a bounded worker pool. Results land in
    /// pre-sized, index-addressed slots, so output order is processing
    /// order regardless of completion order. A slot whose summarization
    /// failed degrades; it never aborts the run.
    pub(crate) async fn stage_summarize_sources(
        &self,
        state: &mut RunState,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let results = state.search_results.clone();
        let mut slots: Vec<Option<SourceSummary>> = (0..results.len()).map(|_| None).collect();

        let semaphore = Arc::new(Semaphore::new(self.config.summarize_workers.max(1)));
        let mut tasks: JoinSet<(usize, SourceSummary)> = JoinSet::new();

        for (index, result) in results.iter().cloned().enumerate() {
            if cancel.is_some_and(|token| token.is_cancelled()) {
                tasks.abort_all();
                return Err(Error::Cancelled);
            }
            let semaphore = semaphore.clone();
            let generator = self.generator.clone();
            let topic = state.topic.clone();
            let retry_budget = self.config.retry_budget;
            let call_timeout = self.config.call_timeout;
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let summary =
                    summarize_one(generator.as_ref(), &topic, &result, retry_budget, call_timeout)
                        .await;
                (index, summary)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, summary)) => slots[index] = Some(summary),
                // A panicked worker leaves its slot empty; it degrades below.
                Err(e) => warn!("Run {}: summarize worker aborted: {}", state.run_id, e),
            }
        }

        state.source_summaries = slots
            .into_iter()
            .zip(results)
            .map(|(slot, result)| {
                slot.unwrap_or_else(|| {
                    SourceSummary::degraded(&result.url, &result.title, DEGRADED_RELEVANCE)
                })
            })
            .collect();

        let degraded = state.source_summaries.iter().filter(|s| s.degraded).count();
        info!(
            "Run {}: {} sources summarized ({} degraded)",
            state.run_id,
            state.source_summaries.len(),
            degraded
        );
        Ok(())
    }

    pub(crate) async fn stage_synthesize(&self, state: &mut RunState) -> Result<()> {
        let plan = state
            .plan
            .as_ref()
            .ok_or_else(|| Error::stage_failed(StageId::Synthesize, "no plan to synthesize from"))?;

        let request = GenRequest::smart(prompts::synthesis_prompt(
            &state.topic,
            plan,
            &state.source_summaries,
        ));
        let draft: SynthesisDraft = generate_structured(
            self.generator.as_ref(),
            &request,
            self.config.retry_budget,
            self.config.call_timeout,
        )
        .await
        .map_err(|e| map_llm_error(StageId::Synthesize, e))?;

        // References come from the summaries in processing order, never from
        // generated text: the brief cannot cite a url the search stage did
        // not produce.
        let mut seen: HashSet<String> = HashSet::new();
        let references: Vec<SourceSummary> = state
            .source_summaries
            .iter()
            .filter(|summary| seen.insert(summary.url.clone()))
            .cloned()
            .collect();

        state.brief = Some(FinalBrief {
            topic: state.topic.clone(),
            introduction: draft.introduction,
            synthesis: draft.synthesis,
            references,
            potential_follow_ups: draft.potential_follow_ups,
        });
        Ok(())
    }
}

async fn summarize_one(
    generator: &dyn Generator,
    topic: &str,
    result: &SearchResult,
    retry_budget: u32,
    call_timeout: Duration,
) -> SourceSummary {
    let request = GenRequest::fast(prompts::summary_prompt(topic, result));
    match generate_structured::<SourceSummary>(generator, &request, retry_budget, call_timeout)
        .await
    {
        Ok(mut summary) => {
            // Cited url and title are the search result's, not generated text
            summary.url = result.url.clone();
            if !result.title.is_empty() {
                summary.title = result.title.clone();
            }
            summary
        }
        Err(e) => {
            warn!("Summarization of {} failed: {}", result.url, e);
            SourceSummary::degraded(&result.url, &result.title, DEGRADED_RELEVANCE)
        }
    }
}

fn map_llm_error(stage: StageId, error: LlmError) -> Error {
    match error {
        LlmError::SchemaViolation {
            attempts, message, ..
        } => Error::SchemaViolation {
            stage,
            attempts,
            message,
        },
        other => Error::stage_failed(stage, other.to_string()),
    }
}
