//! Main-content extraction for arbitrary article pages, backed by
//! `dom_smoothie` (a Readability port). Tables are removed before the
//! readability pass; comment threads and page chrome are dropped by it.

use dom_smoothie::Readability;
use scraper::{Html, Selector};

use crate::extractor::collapse_whitespace;

/// Returns the plain text of the page's main content, one block per line, or
/// `None` when readability finds nothing worth keeping.
pub fn extract_main_text(html: &str, url: Option<&str>) -> Option<String> {
    let cleaned = strip_tables(html);

    let mut readability = match Readability::new(cleaned, url, None) {
        Ok(readability) => readability,
        Err(e) => {
            tracing::debug!("Readability setup failed: {}", e);
            return None;
        }
    };
    let article = match readability.parse() {
        Ok(article) => article,
        Err(e) => {
            tracing::debug!("Readability found no article: {}", e);
            return None;
        }
    };

    let text = normalize_lines(&article.text_content);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn strip_tables(html: &str) -> String {
    let mut document = Html::parse_document(html);
    let Ok(tables) = Selector::parse("table") else {
        return html.to_string();
    };

    let ids: Vec<_> = document.select(&tables).map(|table| table.id()).collect();
    if ids.is_empty() {
        return html.to_string();
    }
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    document.html()
}

/// Collapses whitespace inside each line and drops blank lines.
fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAGRAPHS: &str = r#"
        <h1>Compilers are fun</h1>
        <p>Writing a compiler teaches you about parsing, type checking, and code generation. Every stage
        has its own data structures, its own invariants, and its own failure modes that have to be reported
        clearly to the person at the keyboard.</p>
        <p>Most of the effort, however, goes into error messages that humans can read. A parser that stops
        at the first problem is easy to write, but a parser that recovers, keeps going, and explains what it
        expected is what makes a language pleasant to use every single day.</p>
        <p>Code generation comes last, and by then the interesting decisions have already been made in the
        intermediate representation, where optimisation passes rewrite the program into something faster.</p>
    "#;

    fn page(body_open: &str, wrapper_open: &str, wrapper_close: &str) -> String {
        format!(
            r#"<html><head><title>Compilers</title><style>body {{ color: red; }}</style></head>
            {body_open}
              <nav><a href="/">Home</a> <a href="/about">About</a></nav>
              {wrapper_open}
                <article>{PARAGRAPHS}
                  <table><tr><td>Benchmark numbers that should not appear</td></tr></table>
                </article>
                <div class="comments"><p>Great post, thanks, I learned a lot from this, really.</p></div>
              {wrapper_close}
              <script>trackEverything();</script>
            </body></html>"#
        )
    }

    #[test]
    fn test_extracts_article_text() {
        let text = extract_main_text(&page("<body>", "", ""), None).unwrap();
        assert!(text.contains("Writing a compiler teaches you about parsing"));
        assert!(text.contains("error messages that humans can read."));
    }

    #[test]
    fn test_drops_tables_scripts_and_comments() {
        let text = extract_main_text(&page("<body>", "", ""), None).unwrap();
        assert!(!text.contains("Benchmark"));
        assert!(!text.contains("trackEverything"));
        assert!(!text.contains("Great post"));
    }

    #[test]
    fn test_page_wide_classes_do_not_hide_content() {
        let themed = page(r#"<body class="post single has-sidebar">"#, "", "");
        let text = extract_main_text(&themed, None).unwrap();
        assert!(text.contains("Writing a compiler"));
    }

    #[test]
    fn test_form_wrapped_page_keeps_content() {
        let aspnet = page(
            "<body>",
            r#"<form id="aspnetForm"><div id="main">"#,
            "</div></form>",
        );
        let text = extract_main_text(&aspnet, None).unwrap();
        assert!(text.contains("Code generation comes last"));
    }

    #[test]
    fn test_lines_are_trimmed_and_non_empty() {
        let text = extract_main_text(&page("<body>", "", ""), None).unwrap();
        assert!(text.lines().all(|line| line.trim() == line && !line.is_empty()));
        assert!(!text.contains("  "));
    }

    #[test]
    fn test_strip_tables_keeps_everything_else() {
        let html = "<html><body><p>Keep me</p><table><tr><td>Drop me</td></tr></table></body></html>";
        let stripped = strip_tables(html);
        assert!(stripped.contains("Keep me"));
        assert!(!stripped.contains("Drop me"));
    }

    #[test]
    fn test_normalize_lines() {
        assert_eq!(normalize_lines("  a   b \n\n\t\n c  "), "a b\nc");
    }

    #[test]
    fn test_empty_page_yields_none() {
        assert_eq!(extract_main_text("", None), None);
    }
}
