pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    badge_service::BadgeService, content_service::ContentService,
    progress_service::ProgressService, quiz_service::QuizService, stats_service::StatsService,
    tip_service::TipService, user_service::UserService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub content_service: ContentService,
    pub progress_service: ProgressService,
    pub quiz_service: QuizService,
    pub badge_service: BadgeService,
    pub stats_service: StatsService,
    pub tip_service: TipService,
}

impl AppState {
    pub fn new(pool: PgPool) -> crate::error::Result<Self> {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(anyhow::Error::from)?;

        Ok(Self {
            user_service: UserService::new(pool.clone()),
            content_service: ContentService::new(pool.clone()),
            progress_service: ProgressService::new(pool.clone()),
            quiz_service: QuizService::new(pool.clone()),
            badge_service: BadgeService::new(pool.clone()),
            stats_service: StatsService::new(pool.clone()),
            tip_service: TipService::new(
                config.ai_api_key.clone(),
                config.ai_api_url.clone(),
                http_client,
            ),
            pool,
        })
    }
}
