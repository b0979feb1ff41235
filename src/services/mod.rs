pub mod answer_service;
pub mod expiry_sweeper;
pub mod generation;
pub mod question_bank_service;
pub mod quiz_lifecycle_service;
pub mod statistics_service;

pub use answer_service::AnswerService;
pub use expiry_sweeper::ExpirySweeper;
pub use question_bank_service::QuestionBankService;
pub use quiz_lifecycle_service::QuizLifecycleService;
pub use statistics_service::StatisticsService;
