pub mod article_page;
pub mod quiz_document;
pub mod quiz_question;
pub mod quiz_record;
pub use article_page::ArticlePage;
pub use quiz_document::QuizDocument;
pub use quiz_question::{Difficulty, Question};
pub use quiz_record::{NewQuizRecord, QuizPayload, QuizRecord, QuizSummary};
