use serde::Serialize;

pub const MISSING_TITLE: &str = "No Title Found";

/// Cleaned article text as produced by the extractor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArticlePage {
    pub title: String,
    pub body: String,
}

impl ArticlePage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        ArticlePage {
            title: if title.trim().is_empty() {
                MISSING_TITLE.to_string()
            } else {
                title
            },
            body: body.into(),
        }
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}
