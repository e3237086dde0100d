pub mod badge_service;
pub mod content_service;
pub mod progress_service;
pub mod quiz_service;
pub mod scoring_service;
pub mod stats_service;
pub mod tip_service;
pub mod user_service;
