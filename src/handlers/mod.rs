pub mod quiz_handler;

pub use quiz_handler::{
    configure, generate_quiz, get_history, get_quiz_detail, health_check, health_check_ready, root,
};
