pub mod badge;
pub mod category;
pub mod lesson;
pub mod lesson_progress;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod user;
