pub mod memory_quiz_repository;
pub mod quiz_repository;

pub use memory_quiz_repository::InMemoryQuizRepository;
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
