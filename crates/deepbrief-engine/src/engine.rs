//! Workflow engine - drives the stage graph for one run.
//!
//! The engine owns the run state exclusively for the duration of one `run`
//! call. Stages execute strictly in the transition-table order; the only
//! internal concurrency is the bounded summarize-sources fan-out. The
//! context store is written once, as the last action of a successful run.

use crate::router;
use crate::state::RunState;
use deepbrief_core::{BriefRequest, ContextRecord, Error, FinalBrief, Result, StageId};
use deepbrief_llm::Generator;
use deepbrief_search::SearchProvider;
use deepbrief_store::ContextStore;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Attempts per structured-generation call before a schema violation
    /// surfaces.
    pub retry_budget: u32,
    /// Deadline applied to every external generator/search call.
    pub call_timeout: Duration,
    /// Concurrent workers for the per-source summarization fan-out.
    pub summarize_workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_budget: 3,
            call_timeout: Duration::from_secs(60),
            summarize_workers: 4,
        }
    }
}

/// Result of a successful run. `store_warning` is set when the brief was
/// produced but the context-store write failed.
#[derive(Debug)]
pub struct RunOutcome {
    pub brief: FinalBrief,
    pub store_warning: Option<String>,
}

pub struct Engine {
    pub(crate) generator: Arc<dyn Generator>,
    pub(crate) search: Arc<dyn SearchProvider>,
    pub(crate) store: Arc<dyn ContextStore>,
    pub(crate) config: EngineConfig,
}

impl Engine {
    pub fn new(
        generator: Arc<dyn Generator>,
        search: Arc<dyn SearchProvider>,
        store: Arc<dyn ContextStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            generator,
            search,
            store,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute one run. Fails with a classified error; never returns a
    /// partially-populated brief. Cancellation is honored at stage
    /// boundaries; a cancelled run never writes the context store.
    pub async fn run(
        &self,
        request: BriefRequest,
        cancel: Option<CancellationToken>,
    ) -> Result<RunOutcome> {
        if request.identity.is_empty() {
            return Err(Error::invalid_request("identity must not be empty"));
        }
        if request.topic.trim().is_empty() {
            return Err(Error::invalid_request("topic must not be empty"));
        }

        let mut state = RunState::new(&request);
        info!(
            "Run {} started: topic='{}' follow_up={} depth={}",
            state.run_id, state.topic, state.follow_up, state.search_depth
        );

        let prior = if state.follow_up {
            self.load_prior(&state).await
        } else {
            None
        };

        let mut stage = Some(router::select_entry(state.follow_up, prior.is_some()));
        while let Some(current) = stage {
            check_cancelled(&cancel)?;
            info!("Run {}: stage {}", state.run_id, current);
            self.execute(current, &mut state, prior.as_ref(), cancel.as_ref())
                .await?;
            stage = router::next_stage(current);
        }

        check_cancelled(&cancel)?;

        let brief = state.brief.take().ok_or_else(|| {
            Error::stage_failed(StageId::Synthesize, "run terminated without a brief")
        })?;

        let store_warning = match self.store.put(&state.identity, &brief).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Run {}: context store write failed: {}", state.run_id, e);
                Some(format!(
                    "brief was produced but could not be stored for follow-ups: {}",
                    e
                ))
            }
        };

        info!(
            "Run {} complete: {} references, {} follow-ups",
            state.run_id,
            brief.references.len(),
            brief.potential_follow_ups.len()
        );
        Ok(RunOutcome {
            brief,
            store_warning,
        })
    }

    /// A store read failure is not a run failure: the follow-up degrades to
    /// fresh planning.
    async fn load_prior(&self, state: &RunState) -> Option<ContextRecord> {
        match self.store.get(&state.identity).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                info!(
                    "Run {}: follow-up requested but no prior context for '{}'",
                    state.run_id, state.identity
                );
                None
            }
            Err(e) => {
                warn!(
                    "Run {}: context store read failed, planning fresh: {}",
                    state.run_id, e
                );
                None
            }
        }
    }

    async fn execute(
        &self,
        stage: StageId,
        state: &mut RunState,
        prior: Option<&ContextRecord>,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        match stage {
            StageId::SummarizeContext => self.stage_summarize_context(state, prior).await,
            StageId::Plan => self.stage_plan(state).await,
            StageId::Search => self.stage_search(state).await,
            StageId::SummarizeSources => self.stage_summarize_sources(state, cancel).await,
            StageId::Synthesize => self.stage_synthesize(state).await,
        }
    }
}

pub(crate) fn check_cancelled(cancel: &Option<CancellationToken>) -> Result<()> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(Error::Cancelled),
        _ => Ok(()),
    }
}
