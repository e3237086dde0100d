pub mod admin;
pub mod auth;
pub mod badges;
pub mod content;
pub mod health;
pub mod leaderboard;
pub mod profile;
pub mod quiz;
pub mod tips;
