//! Answer orchestration: search, aggregate the snippets into a context, then synthesize.

pub mod context;
pub mod prompt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::linkup::{LinkupError, SearchClient, SearchResult};
use crate::openai::{AnswerClient, OpenAiError};
pub use context::SearchContext;

/// A synthesized answer together with the URLs it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcedAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("Linkup API request failed: {0}")]
    Search(#[source] LinkupError),

    #[error("No search results found")]
    NoResults,

    #[error("OpenAI processing error: {0}")]
    Answer(#[source] OpenAiError),
}

/// Runs one query end to end. Each step only starts once the previous one
/// succeeded; the first failure ends the request.
pub async fn answer(
    search: &impl SearchClient,
    llm: &impl AnswerClient,
    query: &str,
) -> Result<SourcedAnswer, PipelineError> {
    let query = validate(query)?;
    info!(query, "received search query");

    let results = retrieve(search, query).await?;
    let context = SearchContext::build(&results);
    info!(
        sources = context.sources.len(),
        context_chars = context.text.len(),
        "built search context"
    );

    let answer = synthesize(llm, query, &context).await?;
    Ok(SourcedAnswer {
        answer,
        sources: context.sources,
    })
}

fn validate(query: &str) -> Result<&str, PipelineError> {
    if query.trim().is_empty() {
        return Err(PipelineError::EmptyQuery);
    }
    Ok(query)
}

async fn retrieve(
    search: &impl SearchClient,
    query: &str,
) -> Result<Vec<SearchResult>, PipelineError> {
    let results = search
        .search(query)
        .await
        .map_err(PipelineError::Search)?;

    if results.is_empty() {
        warn!("no results found in search response");
        return Err(PipelineError::NoResults);
    }

    info!(results = results.len(), "processing all search results");
    Ok(results)
}

async fn synthesize(
    llm: &impl AnswerClient,
    query: &str,
    context: &SearchContext,
) -> Result<String, PipelineError> {
    let user_prompt = prompt::user_prompt(query, &context.text);
    let answer = llm
        .complete(prompt::SYSTEM_PROMPT, &user_prompt)
        .await
        .map_err(PipelineError::Answer)?;
    info!("generated answer");
    Ok(answer)
}
