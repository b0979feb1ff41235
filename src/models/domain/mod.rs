pub mod question;
pub mod quiz;
pub mod user_response;

pub use question::{Question, QuestionOption, QuestionType};
pub use quiz::{Quiz, QuizStatus};
pub use user_response::UserResponse;
