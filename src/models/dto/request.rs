use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(url(message = "url must be an absolute URL"))]
    #[validate(length(min = 1, max = 500))]
    pub url: String,
}
