/// Escape characters that break Markdown link syntax: `[`, `]`, `(`, `)`.
///
/// Source URLs come straight from search results and are printed as both the
/// label and the target of a link; Wikipedia-style `_(disambiguation)` paths
/// would otherwise end the link early.
pub(crate) fn escape_md_link(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '[' | ']' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
