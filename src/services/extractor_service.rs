use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{node::Node, ElementRef, Html, Selector};

use crate::errors::{AppError, AppResult};
use crate::models::domain::article_page::{ArticlePage, MISSING_TITLE};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const STOP_SECTIONS: [&str; 5] = [
    "References",
    "See also",
    "Notes",
    "External links",
    "Further reading",
];

/// Elements whose whole subtree never reaches the article text.
const EXCLUDED_SELECTORS: [&str; 13] = [
    "sup",
    "table",
    ".infobox",
    ".navbox",
    ".metadata",
    "span.mw-editsection",
    "div.thumb",
    "figure",
    ".noprint",
    ".reflist",
    ".reference",
    "style",
    "script",
];

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1#firstHeading").expect("TITLE_SELECTOR is a valid selector"));

static CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.mw-parser-output").expect("CONTENT_SELECTOR is a valid selector")
});

static DISAMBIGUATION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#disambigbox").expect("DISAMBIGUATION_SELECTOR is a valid selector")
});

static EXCLUDED: Lazy<Vec<Selector>> = Lazy::new(|| {
    EXCLUDED_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("EXCLUDED_SELECTORS are valid selectors"))
        .collect()
});

static STOP_SECTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    let alternatives = STOP_SECTIONS
        .iter()
        .map(|heading| regex::escape(heading))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?m)^(?:{})$", alternatives))
        .expect("STOP_SECTION_REGEX is a valid regex pattern")
});

static BLANK_LINES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("BLANK_LINES_REGEX is a valid regex pattern"));

/// Source of cleaned article text for a URL.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn extract(&self, url: &str) -> AppResult<ArticlePage>;
}

/// Fetches Wikipedia articles over HTTP and reduces them to plain text.
pub struct WikipediaExtractor {
    client: reqwest::Client,
}

impl WikipediaExtractor {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> AppResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::FetchError(format!("Failed to fetch '{}': {}", url, e)))?;

        let html = response.text().await?;
        Ok(html)
    }
}

#[async_trait]
impl ArticleSource for WikipediaExtractor {
    async fn extract(&self, url: &str) -> AppResult<ArticlePage> {
        log::info!("Scraping {}", url);
        let html = self.fetch(url).await?;
        let page = clean_article(&html)?;
        log::debug!(
            "Extracted '{}' from {} ({} chars)",
            page.title,
            url,
            page.body.chars().count()
        );
        Ok(page)
    }
}

/// Extracts the title and the cleaned body text from an article's HTML.
///
/// Boilerplate subtrees are never mutated out of the parsed document: their node ids are
/// collected first, and the text walk skips them.
pub fn clean_article(html: &str) -> AppResult<ArticlePage> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|heading| normalize_whitespace(&heading.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| MISSING_TITLE.to_string());

    let Some(content) = document.select(&CONTENT_SELECTOR).next() else {
        let disambiguation = document.select(&DISAMBIGUATION_SELECTOR).next().is_some();
        let reason = if disambiguation {
            "the page is a disambiguation page"
        } else {
            "could not find the main content region"
        };
        log::warn!("No main content: {}", reason);
        return Err(AppError::NoMainContent {
            reason: reason.to_string(),
            disambiguation,
        });
    };

    let excluded = excluded_nodes(content);
    let mut lines = Vec::new();
    collect_text(*content, &excluded, &mut lines);

    Ok(ArticlePage::new(title, clean_text(&lines.join("\n"))))
}

/// Cuts the text at the first stop-section heading line and collapses blank-line runs.
/// Running it again on its own output changes nothing.
pub fn clean_text(text: &str) -> String {
    let kept = match STOP_SECTION_REGEX.find(text) {
        Some(stop) => &text[..stop.start()],
        None => text,
    };

    BLANK_LINES_REGEX
        .replace_all(kept, "\n\n")
        .trim()
        .to_string()
}

fn excluded_nodes(content: ElementRef) -> HashSet<NodeId> {
    EXCLUDED
        .iter()
        .flat_map(|selector| content.select(selector))
        .map(|element| element.id())
        .collect()
}

fn collect_text(node: NodeRef<'_, Node>, excluded: &HashSet<NodeId>, lines: &mut Vec<String>) {
    if excluded.contains(&node.id()) {
        return;
    }

    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        Node::Element(_) | Node::Document | Node::Fragment => {
            for child in node.children() {
                collect_text(child, excluded, lines);
            }
        }
        _ => {}
    }
}

fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::python_article_html;

    fn wrap(content: &str) -> String {
        format!(
            r#"<html><body><h1 id="firstHeading">Test Article</h1>
            <div id="mw-content-text"><div class="mw-parser-output">{}</div></div>
            </body></html>"#,
            content
        )
    }

    #[test]
    fn python_article_scenario() {
        let page = clean_article(&python_article_html()).expect("article should extract");

        assert_eq!(page.title, "Python (programming language)");
        assert!(page.body.starts_with("Python is a high-level"));
        assert!(page
            .body
            .ends_with("Python consistently ranks as one of the most popular languages."));
        assert!(!page.body.contains("See also"));
        assert!(!page.body.contains("Guido's reference"));
        assert!(!page.body.contains("Paradigm"));
        assert!(!page.body.contains("[1]"));
    }

    #[test]
    fn boilerplate_elements_are_removed() {
        let html = wrap(
            r##"<p>Kept paragraph<sup class="reference"><a href="#cite">[4]</a></sup>.</p>
            <table class="infobox"><tr><td>Infobox cell</td></tr></table>
            <div class="infobox">Infobox div</div>
            <div class="navbox">Navbox links</div>
            <div class="metadata">Metadata box</div>
            <h2>History<span class="mw-editsection">[edit]</span></h2>
            <div class="thumb"><div class="thumbcaption">Thumbnail caption</div></div>
            <figure><figcaption>Figure caption</figcaption></figure>
            <div class="noprint">Print hidden</div>
            <div class="reflist"><ol><li>Reflist entry</li></ol></div>
            <span class="reference">Inline reference</span>
            <style>.mw-parser-output{color:red}</style>
            <p>Second kept paragraph.</p>"##,
        );

        let page = clean_article(&html).unwrap();

        assert_eq!(
            page.body,
            "Kept paragraph\n.\nHistory\nSecond kept paragraph."
        );
        for removed in [
            "[4]",
            "Infobox",
            "Navbox",
            "Metadata",
            "[edit]",
            "Thumbnail",
            "Figure caption",
            "Print hidden",
            "Reflist",
            "Inline reference",
            "color:red",
        ] {
            assert!(!page.body.contains(removed), "{} leaked into body", removed);
        }
    }

    #[test]
    fn references_line_truncates_everything_after() {
        let html = wrap(
            r#"<p>Before the cut.</p>
            <h2>References</h2>
            <ul><li><a href="https://example.org">Some link text</a></li></ul>
            <p>After the cut.</p>"#,
        );

        let page = clean_article(&html).unwrap();

        assert_eq!(page.body, "Before the cut.");
    }

    #[test]
    fn stop_heading_must_fill_the_whole_line() {
        let html = wrap(
            r#"<p>Notes on style are kept.</p>
            <p>References</p><p>Dropped.</p>"#,
        );

        let page = clean_article(&html).unwrap();

        assert_eq!(page.body, "Notes on style are kept.");
    }

    #[test]
    fn missing_title_is_not_a_failure() {
        let html = r#"<html><body><div class="mw-parser-output"><p>Body</p></div></body></html>"#;

        let page = clean_article(html).unwrap();

        assert_eq!(page.title, MISSING_TITLE);
        assert_eq!(page.body, "Body");
    }

    #[test]
    fn missing_content_region_fails() {
        let html = r#"<html><body><h1 id="firstHeading">Nothing</h1><p>Loose text</p></body></html>"#;

        match clean_article(html) {
            Err(AppError::NoMainContent { disambiguation, .. }) => assert!(!disambiguation),
            other => panic!("expected NoMainContent, got {:?}", other),
        }
    }

    #[test]
    fn disambiguation_page_is_tagged() {
        let html = r#"<html><body><h1 id="firstHeading">Mercury</h1>
            <div id="disambigbox">Mercury may refer to:</div></body></html>"#;

        match clean_article(html) {
            Err(AppError::NoMainContent { disambiguation, .. }) => assert!(disambiguation),
            other => panic!("expected NoMainContent, got {:?}", other),
        }
    }

    #[test]
    fn empty_body_is_returned_not_rejected() {
        let page = clean_article(&wrap("<table><tr><td>only a table</td></tr></table>")).unwrap();
        assert!(page.body.is_empty());
    }

    #[test]
    fn clean_text_collapses_blank_runs() {
        let text = "  First paragraph.\n\n\n  \nSecond paragraph.\n \t\nThird.  ";
        assert_eq!(
            clean_text(text),
            "First paragraph.\n\nSecond paragraph.\n\nThird."
        );
    }

    #[test]
    fn clean_text_is_idempotent() {
        let text = "Intro.\n\n\n\nBody line\n  \nMore.\nSee also\nOther article";
        let once = clean_text(text);

        assert_eq!(once, "Intro.\n\nBody line\n\nMore.");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn clean_text_cuts_at_first_stop_section() {
        let text = "Body.\nExternal links\nLink\nReferences\nRef";
        assert_eq!(clean_text(text), "Body.");
    }
}
