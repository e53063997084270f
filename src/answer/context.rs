use crate::linkup::SearchResult;

/// Search results flattened into the prompt block and the matching citation list.
///
/// `sources[i - 1]` is the URL of the entry labelled `Source i` in `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    pub text: String,
    pub sources: Vec<String>,
}

impl SearchContext {
    /// Every result is kept, in provider order: no dedup, no truncation.
    pub fn build(results: &[SearchResult]) -> Self {
        let mut text = String::new();
        let mut sources = Vec::with_capacity(results.len());

        for (i, result) in results.iter().enumerate() {
            text.push_str(&format!("\nSource {}: {}\n", i + 1, result.name));
            text.push_str(&format!("Content: {}\n", result.content));
            sources.push(result.url.clone());
        }

        Self { text, sources }
    }
}
