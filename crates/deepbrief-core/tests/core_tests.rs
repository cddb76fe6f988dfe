//! Tests for deepbrief-core: identity, request/brief types, stages, errors, config

use deepbrief_core::*;

// ===========================================================================
// Identity
// ===========================================================================

#[test]
fn identity_new_and_display() {
    let id = Identity::new("user-42");
    assert_eq!(id.as_str(), "user-42");
    assert_eq!(format!("{}", id), "user-42");
}

#[test]
fn identity_clone_is_cheap() {
    let id = Identity::new("test");
    let cloned = id.clone();
    assert_eq!(id, cloned);
    assert_eq!(id.as_str(), cloned.as_str());
}

#[test]
fn identity_from_string() {
    let id: Identity = "hello".into();
    assert_eq!(id.as_str(), "hello");
    let id2: Identity = String::from("world").into();
    assert_eq!(id2.as_str(), "world");
}

#[test]
fn identity_equality_and_hash() {
    use std::collections::HashSet;
    let a = Identity::new("same");
    let b = Identity::new("same");
    let c = Identity::new("different");
    assert_eq!(a, b);
    assert_ne!(a, c);
    let mut set = HashSet::new();
    set.insert(a.clone());
    assert!(set.contains(&b));
    assert!(!set.contains(&c));
}

#[test]
fn identity_serde_is_plain_string() {
    let id = Identity::new("user-1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""user-1""#);
    let back: Identity = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

// ===========================================================================
// SearchDepth
// ===========================================================================

#[test]
fn search_depth_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&SearchDepth::Basic).unwrap(), r#""basic""#);
    assert_eq!(serde_json::to_string(&SearchDepth::Advanced).unwrap(), r#""advanced""#);
}

#[test]
fn search_depth_default_is_basic() {
    assert_eq!(SearchDepth::default(), SearchDepth::Basic);
    assert_eq!(SearchDepth::Basic.as_str(), "basic");
    assert_eq!(format!("{}", SearchDepth::Advanced), "advanced");
}

// ===========================================================================
// BriefRequest
// ===========================================================================

#[test]
fn brief_request_builder() {
    let req = BriefRequest::new("user-1", "rust async runtimes")
        .follow_up()
        .with_depth(SearchDepth::Advanced);
    assert_eq!(req.identity.as_str(), "user-1");
    assert_eq!(req.topic, "rust async runtimes");
    assert!(req.follow_up);
    assert_eq!(req.search_depth, SearchDepth::Advanced);
}

#[test]
fn brief_request_deserializes_with_defaults() {
    let req: BriefRequest =
        serde_json::from_str(r#"{"identity": "u", "topic": "t"}"#).unwrap();
    assert!(!req.follow_up);
    assert_eq!(req.search_depth, SearchDepth::Basic);
}

// ===========================================================================
// ResearchPlan
// ===========================================================================

#[test]
fn research_plan_queries_in_order() {
    let plan = ResearchPlan {
        topic: "t".into(),
        steps: vec![
            PlanStep { question: "q1".into(), search_query: "s1".into() },
            PlanStep { question: "q2".into(), search_query: "s2".into() },
        ],
    };
    let queries: Vec<&str> = plan.queries().collect();
    assert_eq!(queries, vec!["s1", "s2"]);
}

// ===========================================================================
// SourceSummary
// ===========================================================================

#[test]
fn source_summary_degraded_constructor() {
    let summary = SourceSummary::degraded("https://x.test", "X", "source unavailable");
    assert!(summary.degraded);
    assert!(summary.key_points.is_empty());
    assert_eq!(summary.url, "https://x.test");
    assert_eq!(summary.relevance_to_topic, "source unavailable");
}

#[test]
fn source_summary_degraded_defaults_false_on_deserialize() {
    let summary: SourceSummary = serde_json::from_str(
        r#"{"url":"https://x.test","title":"X","key_points":["a"],"relevance_to_topic":"r"}"#,
    )
    .unwrap();
    assert!(!summary.degraded);
}

// ===========================================================================
// FinalBrief
// ===========================================================================

fn sample_brief() -> FinalBrief {
    FinalBrief {
        topic: "Jodhpur".into(),
        introduction: "The blue city.".into(),
        synthesis: "Forts and monsoon views.".into(),
        references: vec![
            SourceSummary {
                url: "https://a.test".into(),
                title: "A".into(),
                key_points: vec!["fort".into()],
                relevance_to_topic: "covers the fort".into(),
                degraded: false,
            },
            SourceSummary::degraded("https://b.test", "B", "fetch failed"),
        ],
        potential_follow_ups: vec!["What about photography?".into()],
    }
}

#[test]
fn final_brief_stable_field_names() {
    let json = serde_json::to_value(sample_brief()).unwrap();
    assert!(json.get("topic").is_some());
    assert!(json.get("introduction").is_some());
    assert!(json.get("synthesis").is_some());
    assert!(json.get("references").is_some());
    assert!(json.get("potential_follow_ups").is_some());
    let first = &json["references"][0];
    assert!(first.get("url").is_some());
    assert!(first.get("key_points").is_some());
    assert!(first.get("relevance_to_topic").is_some());
}

#[test]
fn final_brief_serde_roundtrip() {
    let brief = sample_brief();
    let json = serde_json::to_string(&brief).unwrap();
    let back: FinalBrief = serde_json::from_str(&json).unwrap();
    assert_eq!(back.topic, brief.topic);
    assert_eq!(back.references.len(), 2);
    assert!(back.references[1].degraded);
}

#[test]
fn final_brief_render_markdown_sections() {
    let md = sample_brief().render_markdown();
    assert!(md.contains("## Research Brief: Jodhpur"));
    assert!(md.contains("### Introduction"));
    assert!(md.contains("### Synthesis"));
    assert!(md.contains("### Potential Follow-up Questions"));
    assert!(md.contains("1. What about photography?"));
    assert!(md.contains("### References"));
    assert!(md.contains("[A](https://a.test)"));
    // Degraded references are marked
    assert!(md.contains("*(unavailable)*"));
}

// ===========================================================================
// ContextRecord
// ===========================================================================

#[test]
fn context_record_new_carries_identity_and_brief() {
    let record = ContextRecord::new(Identity::new("u"), sample_brief());
    assert_eq!(record.identity.as_str(), "u");
    assert_eq!(record.last_brief.topic, "Jodhpur");
}

// ===========================================================================
// StageId
// ===========================================================================

#[test]
fn stage_id_as_str() {
    assert_eq!(StageId::SummarizeContext.as_str(), "summarize-context");
    assert_eq!(StageId::Plan.as_str(), "plan");
    assert_eq!(StageId::Search.as_str(), "search");
    assert_eq!(StageId::SummarizeSources.as_str(), "summarize-sources");
    assert_eq!(StageId::Synthesize.as_str(), "synthesize");
}

#[test]
fn stage_id_serde_kebab_case() {
    assert_eq!(serde_json::to_string(&StageId::SummarizeContext).unwrap(), r#""summarize-context""#);
    let back: StageId = serde_json::from_str(r#""plan""#).unwrap();
    assert_eq!(back, StageId::Plan);
}

// ===========================================================================
// Error
// ===========================================================================

#[test]
fn error_stage_failed_display() {
    let err = Error::stage_failed(StageId::Search, "provider unreachable");
    assert_eq!(format!("{}", err), "stage search failed: provider unreachable");
    assert_eq!(err.stage(), Some(StageId::Search));
}

#[test]
fn error_schema_violation_carries_stage() {
    let err = Error::SchemaViolation {
        stage: StageId::Plan,
        attempts: 3,
        message: "missing field `steps`".into(),
    };
    assert_eq!(err.stage(), Some(StageId::Plan));
    assert!(format!("{}", err).contains("after 3 attempts"));
}

#[test]
fn error_without_stage() {
    assert_eq!(Error::Cancelled.stage(), None);
    assert_eq!(Error::invalid_request("empty topic").stage(), None);
    assert_eq!(Error::context_store("disk full").stage(), None);
}

// ===========================================================================
// DeepbriefConfig
// ===========================================================================

#[test]
fn config_defaults() {
    let config = DeepbriefConfig::default();
    assert_eq!(config.pipeline.retry_budget, 3);
    assert_eq!(config.pipeline.call_timeout_secs, 60);
    assert_eq!(config.pipeline.summarize_workers, 4);
    assert!(config.models.fast.is_none());
    assert!(config.gateway.port.is_none());
}

#[test]
fn config_parses_partial_json() {
    let config: DeepbriefConfig = serde_json::from_str(
        r#"{
            "gateway": {"port": 9000},
            "models": {"fast": "llama-3.1-8b-instant"},
            "pipeline": {"retryBudget": 5}
        }"#,
    )
    .unwrap();
    assert_eq!(config.gateway.port, Some(9000));
    assert_eq!(config.models.fast.as_deref(), Some("llama-3.1-8b-instant"));
    assert_eq!(config.pipeline.retry_budget, 5);
    // Unspecified pipeline fields keep defaults
    assert_eq!(config.pipeline.summarize_workers, 4);
}

#[test]
fn config_load_missing_file_is_default() {
    let config = DeepbriefConfig::load(std::path::Path::new("/nonexistent/deepbrief.json"));
    assert_eq!(config.pipeline.retry_budget, 3);
}
