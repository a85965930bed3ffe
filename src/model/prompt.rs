//! Rewrite prompt construction.

const INSTRUCTIONS: &str = "You are a podcast writer. Rewrite the article below as a natural \
script for a single host. Keep it engaging and clear: open with a short intro, cover the \
material in 3-5 brief segments with spoken signposts, and close with a concise outro. \
Aim for 6-10 minutes of speech. Write plain prose only, with no JSON, markdown or stage \
directions.";

/// Build the rewrite prompt for an article.
///
/// The title line is omitted when no title is known.
pub fn build_prompt(article_text: &str, title: Option<&str>, style: &str) -> String {
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + article_text.len() + 64);
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\nStyle: ");
    prompt.push_str(style);
    prompt.push('\n');
    if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str("Title: ");
        prompt.push_str(title);
        prompt.push('\n');
    }
    prompt.push_str("Article:\n");
    prompt.push_str(article_text);
    prompt
}
