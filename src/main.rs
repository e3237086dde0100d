use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use codedonki_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{auth, cors},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool)?;

    let public_api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/signup", post(routes::auth::signup))
        .route("/api/login", post(routes::auth::login));

    let user_api = Router::new()
        .route(
            "/api/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .route("/api/profile/password", put(routes::profile::change_password))
        .route("/api/profile/badges", get(routes::badges::my_badges))
        .route("/api/categories", get(routes::content::list_categories))
        .route("/api/lessons", get(routes::content::list_lessons))
        .route("/api/lessons/status", get(routes::content::lessons_with_status))
        .route("/api/lessons/slug/:slug", get(routes::content::get_lesson_by_slug))
        .route("/api/lessons/:id", get(routes::content::get_lesson))
        .route("/api/quiz/submit", post(routes::quiz::submit_quiz))
        .route("/api/quiz/:lesson_id", get(routes::quiz::get_quiz))
        .route("/api/leaderboard", get(routes::leaderboard::leaderboard))
        .route("/api/badges", get(routes::badges::list_badges))
        .route("/api/ai/suggestion", post(routes::tips::study_tip))
        .layer(from_fn(auth::require_bearer_auth));

    let admin_api = Router::new()
        .route("/api/admin/categories", post(routes::admin::create_category))
        .route(
            "/api/admin/categories/:id",
            put(routes::admin::update_category).delete(routes::admin::delete_category),
        )
        .route("/api/admin/lessons", post(routes::admin::create_lesson))
        .route("/api/admin/lessons/next-level", get(routes::admin::next_level))
        .route(
            "/api/admin/lessons/:id",
            put(routes::admin::update_lesson).delete(routes::admin::delete_lesson),
        )
        .route(
            "/api/admin/quiz",
            get(routes::admin::list_questions).post(routes::admin::create_question),
        )
        .route(
            "/api/admin/quiz/:id",
            put(routes::admin::update_question).delete(routes::admin::delete_question),
        )
        .route("/api/admin/badges", post(routes::admin::create_badge))
        .route(
            "/api/admin/badges/:id",
            put(routes::admin::update_badge).delete(routes::admin::delete_badge),
        )
        .route("/api/admin/users", get(routes::admin::list_users))
        .route("/api/admin/users/:id", delete(routes::admin::delete_user))
        .route("/api/admin/users/:id/promote", put(routes::admin::promote_user))
        .route(
            "/api/admin/users/:id/reset-progress",
            put(routes::admin::reset_user_progress),
        )
        .route(
            "/api/admin/users/:id/award-badges",
            post(routes::admin::award_badges),
        )
        .route(
            "/api/admin/dashboard/stats",
            get(routes::admin::dashboard_stats),
        )
        .layer(from_fn(auth::require_admin));

    let app = public_api
        .merge(user_api)
        .merge(admin_api)
        .with_state(app_state)
        .layer(cors::permissive_cors())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
