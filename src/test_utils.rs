pub mod fixtures {
    use serde_json::{json, Value};

    use crate::models::domain::QuizDocument;

    /// A valid five-question quiz, as the model would return it.
    pub fn sample_quiz_json() -> Value {
        json!({
            "id": 1,
            "title": "Python Programming Language",
            "summary": "Python is a high-level, general-purpose programming language that emphasizes code readability.",
            "key_entities": ["Guido van Rossum", "Python Software Foundation", "CPython", "PEP 8"],
            "organizations": ["Python Software Foundation", "Centrum Wiskunde & Informatica"],
            "locations": ["Netherlands"],
            "sections": ["History", "Design philosophy and features", "Syntax and semantics"],
            "suggested_topics": ["Guido van Rossum", "CPython", "Zen of Python", "PyPI"],
            "quiz": [
                {
                    "question_id": "q1",
                    "text": "Which design goal does Python's use of significant indentation serve?",
                    "options": ["Code readability", "Faster execution", "Smaller binaries", "Static typing"],
                    "answer": "Code readability",
                    "explanation": "Python's design philosophy emphasizes readability through significant indentation.",
                    "difficulty": "easy"
                },
                {
                    "question_id": "q2",
                    "text": "Who created Python?",
                    "options": ["Guido van Rossum", "James Gosling", "Dennis Ritchie", "Bjarne Stroustrup"],
                    "answer": "Guido van Rossum",
                    "explanation": "Guido van Rossum began working on Python in the late 1980s.",
                    "difficulty": "easy"
                },
                {
                    "question_id": "q3",
                    "text": "Which organization manages Python's development?",
                    "options": ["Python Software Foundation", "Apache Software Foundation", "Mozilla Foundation", "Linux Foundation"],
                    "answer": "Python Software Foundation",
                    "explanation": "The Python Software Foundation manages and directs resources for Python development.",
                    "difficulty": "medium"
                },
                {
                    "question_id": "q4",
                    "text": "What is the name of the reference implementation of Python?",
                    "options": ["CPython", "Jython", "PyPy", "IronPython"],
                    "answer": "CPython",
                    "explanation": "CPython, written in C, is the reference implementation of the language.",
                    "difficulty": "medium"
                },
                {
                    "question_id": "q5",
                    "text": "Which Python version was released in 2008 and broke backward compatibility?",
                    "options": ["Python 2.0", "Python 3.0", "Python 1.0", "Python 2.7"],
                    "answer": "Python 3.0",
                    "explanation": "Python 3.0 was a major revision that is not completely backward-compatible.",
                    "difficulty": "hard"
                }
            ]
        })
    }

    pub fn sample_quiz_document() -> QuizDocument {
        serde_json::from_value(sample_quiz_json()).expect("sample quiz fixture deserializes")
    }

    /// A trimmed-down Wikipedia article page with the usual boilerplate around the prose.
    pub fn python_article_html() -> String {
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Python (programming language) - Wikipedia</title>
  <style>body { font-family: sans-serif; }</style>
</head>
<body>
  <div id="mw-navigation"><a href="/wiki/Main_Page">Main page</a></div>
  <h1 id="firstHeading" class="firstHeading">Python (programming language)</h1>
  <div id="mw-content-text">
    <div class="mw-parser-output">
      <div class="metadata">This article is about the programming language.</div>
      <table class="infobox vevent">
        <tbody>
          <tr><th>Paradigm</th><td>Multi-paradigm</td></tr>
          <tr><th>Designed by</th><td>Guido van Rossum</td></tr>
        </tbody>
      </table>
      <p>Python is a high-level, general-purpose programming language.<sup id="cite_ref-1" class="reference"><a href="#cite_note-1">[1]</a></sup></p>
      <p>Its design philosophy emphasizes code readability with the use of significant indentation.</p>
      <div class="thumb tright"><div class="thumbcaption">Guido van Rossum at OSCON 2006</div></div>
      <h2><span class="mw-headline" id="History">History</span><span class="mw-editsection">[edit]</span></h2>
      <p>Python was conceived in the late 1980s by Guido van Rossum.<sup class="reference"><a href="#cite_note-2">[2]</a></sup></p>
      <p>Python consistently ranks as one of the most popular languages.</p>
      <h2><span class="mw-headline" id="See_also">See also</span><span class="mw-editsection">[edit]</span></h2>
      <ul><li><a href="/wiki/Python_syntax_and_semantics">Python syntax and semantics</a></li></ul>
      <h2><span class="mw-headline" id="References">References</span></h2>
      <div class="reflist"><ol class="references"><li id="cite_note-1">Guido's reference</li></ol></div>
      <div class="navbox">Python navigation</div>
    </div>
  </div>
  <script>window.RLQ = [];</script>
</body>
</html>"##
            .to_string()
    }
}

pub mod stubs {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::errors::{AppError, AppResult};
    use crate::models::domain::{ArticlePage, QuizDocument};
    use crate::services::extractor_service::ArticleSource;
    use crate::services::quiz_generator_service::QuizGenerator;

    pub struct StaticArticleSource {
        page: ArticlePage,
    }

    impl StaticArticleSource {
        pub fn new(page: ArticlePage) -> Self {
            Self { page }
        }
    }

    #[async_trait]
    impl ArticleSource for StaticArticleSource {
        async fn extract(&self, _url: &str) -> AppResult<ArticlePage> {
            Ok(self.page.clone())
        }
    }

    pub struct FailingArticleSource {
        error: AppError,
    }

    impl FailingArticleSource {
        pub fn new(error: AppError) -> Self {
            Self { error }
        }
    }

    #[async_trait]
    impl ArticleSource for FailingArticleSource {
        async fn extract(&self, _url: &str) -> AppResult<ArticlePage> {
            Err(self.error.clone())
        }
    }

    /// Generator with a canned outcome that remembers what it was asked.
    pub struct RecordingGenerator {
        outcome: AppResult<QuizDocument>,
        calls: AtomicUsize,
        last_input: Mutex<Option<String>>,
    }

    impl RecordingGenerator {
        pub fn returning(document: QuizDocument) -> Self {
            Self::with_outcome(Ok(document))
        }

        pub fn failing(error: AppError) -> Self {
            Self::with_outcome(Err(error))
        }

        fn with_outcome(outcome: AppResult<QuizDocument>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                last_input: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_input(&self) -> Option<String> {
            self.last_input.lock().expect("lock not poisoned").clone()
        }
    }

    #[async_trait]
    impl QuizGenerator for RecordingGenerator {
        async fn generate(&self, article_text: &str) -> AppResult<QuizDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().expect("lock not poisoned") = Some(article_text.to_string());
            self.outcome.clone()
        }
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn sample_quiz_fixture_has_five_questions() {
        let document = sample_quiz_document();
        assert_eq!(document.title, "Python Programming Language");
        assert_eq!(document.quiz.len(), 5);
        assert_eq!(document.quiz[1].answer, "Guido van Rossum");
    }
}
