use super::InterfaceError;
use crate::answer::SourcedAnswer;
use crate::markdown::escape_md_link;

pub const EMPTY_QUERY_WARNING: &str = "Please enter a search query.";

/// Answer text followed by a numbered list of links, label and target both the URL.
pub fn render_answer(answer: &SourcedAnswer) -> String {
    let mut output = String::from("### Answer\n\n");
    output.push_str(&answer.answer);
    output.push_str("\n\n### Sources\n\n");

    for (i, source) in answer.sources.iter().enumerate() {
        let link = escape_md_link(source);
        output.push_str(&format!("{}. [{link}]({link})\n", i + 1));
    }

    output
}

/// Every failure is shown the same way; an empty query is a warning, not an error.
pub fn render_error(err: &InterfaceError) -> String {
    match err {
        InterfaceError::EmptyQuery => EMPTY_QUERY_WARNING.to_string(),
        _ => format!("Error: {err}"),
    }
}
