//! Prompt construction for each generator-backed stage.

use deepbrief_core::{FinalBrief, ResearchPlan, SearchResult, SourceSummary};

/// Snippet text beyond this is noise for a summary prompt.
const MAX_SNIPPET_CHARS: usize = 5000;

pub fn recall_prompt(prior: &FinalBrief) -> String {
    format!(
        "Below is a research brief previously produced for this user.\n\
         Condense it into a short paragraph of context (3-5 sentences) that a\n\
         research planner could use to interpret a follow-up question. Keep\n\
         concrete entity names (places, people, products) intact; drop\n\
         everything else.\n\n\
         Topic: {}\n\nIntroduction:\n{}\n\nSynthesis:\n{}",
        prior.topic, prior.introduction, prior.synthesis
    )
}

pub fn plan_prompt(topic: &str, recalled_context: Option<&str>) -> String {
    let mut prompt = format!(
        "As a professional research assistant, create a research plan for the\n\
         following topic: '{}'.\n\n\
         Return a JSON object with this exact shape:\n\
         {{\n\
           \"topic\": the research topic,\n\
           \"steps\": an array of 3 to 6 objects, each with:\n\
             \"question\": a specific research question to answer,\n\
             \"search_query\": the search engine query that answers it\n\
         }}\n\n\
         Return ONLY the JSON object, no prose and no code fences.",
        topic
    );
    if let Some(context) = recalled_context {
        prompt.push_str(&format!(
            "\n\nThis topic is a FOLLOW-UP to earlier research. Context from\n\
             that research:\n{}\n\n\
             Interpret the topic in light of this context: resolve pronouns\n\
             and vague references (\"those places\", \"it\") to the concrete\n\
             entities named above, and scope every search query to those\n\
             entities rather than the bare topic text.",
            context
        ));
    }
    prompt
}

pub fn summary_prompt(topic: &str, result: &SearchResult) -> String {
    format!(
        "Create a structured summary of the following search result. The\n\
         research is for the topic: '{}'.\n\n\
         Return a JSON object with this exact shape:\n\
         {{\n\
           \"url\": \"{}\",\n\
           \"title\": the title of the source,\n\
           \"key_points\": 3-5 key takeaways as an array of strings,\n\
           \"relevance_to_topic\": one sentence on why this source matters for the topic\n\
         }}\n\n\
         Return ONLY the JSON object, no prose and no code fences.\n\n\
         Source url: {}\n\
         Source title: {}\n\
         Source content:\n---\n{}\n---",
        topic,
        result.url,
        result.url,
        result.title,
        truncate(&result.snippet, MAX_SNIPPET_CHARS)
    )
}

pub fn synthesis_prompt(topic: &str, plan: &ResearchPlan, summaries: &[SourceSummary]) -> String {
    let questions: Vec<String> = plan
        .steps
        .iter()
        .map(|step| format!("- {}", step.question))
        .collect();
    let summaries_json =
        serde_json::to_string_pretty(summaries).unwrap_or_else(|_| "[]".to_string());

    format!(
        "As a senior research analyst, produce a research brief on the topic:\n\
         \"{}\".\n\n\
         The research questions were:\n{}\n\n\
         You are given structured summaries of the web sources that were\n\
         consulted (a summary marked \"degraded\" could not be retrieved and\n\
         contributed no content; do not cite it for facts):\n---\n{}\n---\n\n\
         Return a JSON object with this exact shape:\n\
         {{\n\
           \"introduction\": a brief, engaging introduction to the topic,\n\
           \"synthesis\": the main body, a detailed synthesis answering the\n\
             research questions from the sources, highlighting any consensus\n\
             or disagreement among them,\n\
           \"potential_follow_ups\": 2-3 follow-up questions that further web\n\
             research could genuinely answer\n\
         }}\n\n\
         Return ONLY the JSON object, no prose and no code fences.",
        topic,
        questions.join("\n"),
        summaries_json
    )
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
