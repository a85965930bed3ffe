//! Readable-text extraction from HTML documents.

use crate::collab::{CollabResult, CollaboratorError, TextExtractor};
use scraper::{ElementRef, Html, Selector};

/// Elements whose content is never narrated.
const EXCLUDED: [&str; 7] = ["script", "style", "noscript", "header", "footer", "nav", "aside"];

/// Paragraph-based extractor.
///
/// Paragraphs inside `<article>` win when there are any; otherwise every
/// paragraph in the document is used. Paragraphs are joined by newlines.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl TextExtractor for HtmlExtractor {
    fn extract(&self, document: &str) -> CollabResult<String> {
        let html = Html::parse_document(document);
        let article_paragraphs =
            Selector::parse("article p").unwrap_or_else(|_| unreachable!());
        let all_paragraphs = Selector::parse("p").unwrap_or_else(|_| unreachable!());

        let mut paragraphs = collect(html.select(&article_paragraphs));
        if paragraphs.is_empty() {
            paragraphs = collect(html.select(&all_paragraphs));
        }
        if paragraphs.is_empty() {
            return Err(CollaboratorError::NoReadableContent);
        }
        Ok(paragraphs.join("\n"))
    }
}

fn collect<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements
        .filter(|p| !inside_excluded(*p))
        .map(paragraph_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn inside_excluded(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| EXCLUDED.contains(&el.name()))
    })
}

/// Visible text of one paragraph with whitespace collapsed.
fn paragraph_text(paragraph: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in paragraph.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| EXCLUDED.contains(&el.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_article_paragraphs() {
        let html = r#"<html><body>
            <p>Sidebar teaser</p>
            <article><p>First   para.</p><p>Second
            para.</p></article>
        </body></html>"#;
        assert_eq!(
            HtmlExtractor.extract(html).unwrap(),
            "First para.\nSecond para."
        );
    }

    #[test]
    fn test_falls_back_to_all_paragraphs() {
        let html = "<html><body><div><p>One.</p></div><p>Two.</p></body></html>";
        assert_eq!(HtmlExtractor.extract(html).unwrap(), "One.\nTwo.");
    }

    #[test]
    fn test_skips_navigation_and_scripts() {
        let html = r#"<html><body>
            <header><p>Site header</p></header>
            <nav><p>Menu</p></nav>
            <p>Real text <script>track()</script>here.</p>
            <aside><p>Related</p></aside>
            <footer><p>Copyright</p></footer>
        </body></html>"#;
        assert_eq!(HtmlExtractor.extract(html).unwrap(), "Real text here.");
    }

    #[test]
    fn test_blank_paragraphs_are_dropped() {
        let html = "<p>  </p><p>Kept.</p><p>\n</p>";
        assert_eq!(HtmlExtractor.extract(html).unwrap(), "Kept.");
    }

    #[test]
    fn test_no_paragraphs_is_no_readable_content() {
        let html = "<html><body><div>Just a div</div></body></html>";
        assert_eq!(
            HtmlExtractor.extract(html),
            Err(CollaboratorError::NoReadableContent)
        );
    }

    #[test]
    fn test_inline_markup_is_flattened() {
        let html = "<article><p>A <b>bold</b> and <a href='#'>linked</a> word.</p></article>";
        assert_eq!(
            HtmlExtractor.extract(html).unwrap(),
            "A bold and linked word."
        );
    }
}
