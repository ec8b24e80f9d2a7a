pub mod extractor_service;
pub mod model_service;
pub mod quiz_generator_service;
pub mod quiz_service;
