pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that provides accurate and informative answers. \
Your goal is to answer questions using only the context provided to you. \
Always reference specific sources in your answer, and never mention things that are not included in the given context. \
Use bullet points when appropriate to structure your answer in a user-friendly way, but only if it enhances clarity.";

pub fn user_prompt(query: &str, context: &str) -> String {
    format!(
        r#"Based on the following search results, provide a comprehensive answer to the query: "{query}"

Search Results:
{context}

Please provide a detailed answer that:
1. Is based strictly on the provided search results
2. References specific sources when presenting information
3. Uses bullet points where it helps clarity
4. Is well-structured and easy to read
5. Only includes information found in the given context

Keep your answer focused and informative, and make sure every statement can be traced back to the provided sources."#
    )
}
