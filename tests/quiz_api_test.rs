use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use codedonki_backend::dto::content_dto::{
    CreateBadgePayload, CreateCategoryPayload, CreateLessonPayload, CreateQuestionPayload,
};
use codedonki_backend::dto::user_dto::SignupPayload;

// Needs a running Postgres at DATABASE_URL; run with `cargo test -- --ignored`.
#[tokio::test]
#[ignore]
async fn quiz_flow_end_to_end() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");

    codedonki_backend::config::init_config().expect("init config");
    let pool = codedonki_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let app_state = codedonki_backend::AppState::new(pool.clone()).expect("state");
    let run_id = Uuid::new_v4();

    let user = app_state
        .user_service
        .signup(SignupPayload {
            name: "Quiz Taker".into(),
            email: format!("taker_{}@example.com", run_id),
            password: "hunter22".into(),
        })
        .await
        .expect("signup");

    let category = app_state
        .content_service
        .create_category(CreateCategoryPayload {
            name: format!("Basics {}", run_id),
            description: "Intro topics".into(),
            color: None,
            icon: None,
            slug: None,
        })
        .await
        .expect("category");

    // Fixed XP range so the award is deterministic.
    let lesson = app_state
        .content_service
        .create_lesson(CreateLessonPayload {
            title: format!("Variables {}", run_id),
            description: None,
            category_id: category.id,
            order_in_category: Some(1),
            pass_threshold: 70,
            xp_min: 80,
            xp_max: 80,
        })
        .await
        .expect("lesson one");
    let lesson_two = app_state
        .content_service
        .create_lesson(CreateLessonPayload {
            title: format!("Functions {}", run_id),
            description: None,
            category_id: category.id,
            order_in_category: Some(2),
            pass_threshold: 70,
            xp_min: 80,
            xp_max: 80,
        })
        .await
        .expect("lesson two");

    let q1 = app_state
        .content_service
        .create_question(CreateQuestionPayload {
            lesson_id: lesson.id,
            question_text: "What keyword declares an immutable binding?".into(),
            option_a: "let".into(),
            option_b: "var".into(),
            option_c: "const fn".into(),
            option_d: "static mut".into(),
            correct_answer: "A".into(),
            explanation: String::new(),
        })
        .await
        .expect("question 1");
    let q2 = app_state
        .content_service
        .create_question(CreateQuestionPayload {
            lesson_id: lesson.id,
            question_text: "Which keyword makes a binding mutable?".into(),
            option_a: "mutable".into(),
            option_b: "mut".into(),
            option_c: "var".into(),
            option_d: "dyn".into(),
            correct_answer: "B".into(),
            explanation: String::new(),
        })
        .await
        .expect("question 2");

    let q3 = app_state
        .content_service
        .create_question(CreateQuestionPayload {
            lesson_id: lesson_two.id,
            question_text: "What does fn declare?".into(),
            option_a: "A module".into(),
            option_b: "A trait".into(),
            option_c: "A function".into(),
            option_d: "A macro".into(),
            correct_answer: "C".into(),
            explanation: String::new(),
        })
        .await
        .expect("question 3");

    // Threshold the first pass crosses (80 XP earned vs 50 required).
    let badge = app_state
        .badge_service
        .create(CreateBadgePayload {
            name: format!("First Steps {}", run_id),
            description: "Earn 50 XP".into(),
            xp_threshold: 50,
            icon_url: None,
            color: None,
        })
        .await
        .expect("badge");

    let config = codedonki_backend::config::get_config();
    let token = codedonki_backend::utils::token::issue_token(
        user.id,
        &user.role,
        &config.jwt_secret,
        config.token_ttl_hours,
    )
    .expect("token");

    let app = Router::new()
        .route(
            "/api/quiz/submit",
            post(codedonki_backend::routes::quiz::submit_quiz),
        )
        .route(
            "/api/quiz/:lesson_id",
            get(codedonki_backend::routes::quiz::get_quiz),
        )
        .route(
            "/api/lessons/status",
            get(codedonki_backend::routes::content::lessons_with_status),
        )
        .route(
            "/api/leaderboard",
            get(codedonki_backend::routes::leaderboard::leaderboard),
        )
        .layer(from_fn(
            codedonki_backend::middleware::auth::require_bearer_auth,
        ))
        .with_state(app_state.clone());

    // Taker view must not expose the correct tags.
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/quiz/{}", lesson.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let questions: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(questions.as_array().unwrap().len(), 2);
    assert!(questions[0].get("correct_answer").is_none());

    // Failing attempt: one of two correct is 50%, below the 70% threshold.
    let submit_body = json!({
        "lesson_id": lesson.id,
        "answers": { (q1.id.to_string()): "A", (q2.id.to_string()): "D" },
        "time_taken_seconds": 30
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/quiz/submit")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["score"], 50);
    assert_eq!(body["passed"], false);
    assert_eq!(body["xp_awarded"], 0);
    assert!(body["retry_message"].is_string());

    // The failed attempt still leaves an audit row behind.
    let (attempts, failed_attempts): (i64, i64) = sqlx::query_as(
        r#"SELECT COUNT(*), COUNT(*) FILTER (WHERE NOT passed)
           FROM quiz_attempts WHERE user_id = $1 AND lesson_id = $2"#,
    )
    .bind(user.id)
    .bind(lesson.id)
    .fetch_one(&pool)
    .await
    .expect("attempt count");
    assert_eq!(attempts, 1);
    assert_eq!(failed_attempts, 1);

    // Passing attempt at exactly the expected pace earns base XP, no bonus.
    let submit_body = json!({
        "lesson_id": lesson.id,
        "answers": { (q1.id.to_string()): "A", (q2.id.to_string()): "B" },
        "time_taken_seconds": 60
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/quiz/submit")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["score"], 100);
    assert_eq!(body["passed"], true);
    assert_eq!(body["base_xp"], 80);
    assert_eq!(body["time_bonus"], 0);
    assert_eq!(body["xp_awarded"], 80);
    assert_eq!(body["new_total_xp"], 80);

    // Crossing the 50 XP threshold grants the badge exactly once.
    let new_badges = body["new_badges"].as_array().expect("new_badges array");
    assert_eq!(new_badges.len(), 1);
    assert_eq!(new_badges[0]["id"], json!(badge.id));

    // Resubmitting with unchanged badge state grants nothing new.
    let submit_body = json!({
        "lesson_id": lesson.id,
        "answers": { (q1.id.to_string()): "A", (q2.id.to_string()): "B" },
        "time_taken_seconds": 60
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/quiz/submit")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["passed"], true);
    assert_eq!(body["new_badges"].as_array().unwrap().len(), 0);

    let badge_rows: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM user_badges WHERE user_id = $1"#)
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .expect("badge count");
    assert_eq!(badge_rows, 1);

    // Passing the first lesson unlocks the second.
    let req = Request::builder()
        .method("GET")
        .uri("/api/lessons/status")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let lessons: JsonValue = serde_json::from_slice(&bytes).unwrap();
    let second = lessons
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"] == json!(lesson_two.id))
        .expect("second lesson in status list");
    assert_eq!(second["is_unlocked"], true);
    assert_eq!(second["is_completed"], false);

    // Passing the last lesson of the category succeeds with nothing left
    // to unlock: only the two lessons' progress rows exist afterwards.
    let submit_body = json!({
        "lesson_id": lesson_two.id,
        "answers": { (q3.id.to_string()): "C" },
        "time_taken_seconds": 0
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/quiz/submit")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(submit_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["passed"], true);

    let progress_rows: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM lesson_progress WHERE user_id = $1"#)
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .expect("progress count");
    assert_eq!(progress_rows, 2);

    // The reward range update guard rejects an inverted range up front.
    let err = app_state
        .content_service
        .update_lesson(
            lesson.id,
            codedonki_backend::dto::content_dto::UpdateLessonPayload {
                title: None,
                description: None,
                category_id: None,
                order_in_category: None,
                pass_threshold: None,
                xp_min: Some(90),
                xp_max: Some(10),
            },
        )
        .await
        .expect_err("inverted range must be rejected");
    assert!(matches!(
        err,
        codedonki_backend::error::Error::BadRequest(_)
    ));

    // Same guard when only one side changes: 200 against the stored max of 80.
    let err = app_state
        .content_service
        .update_lesson(
            lesson.id,
            codedonki_backend::dto::content_dto::UpdateLessonPayload {
                title: None,
                description: None,
                category_id: None,
                order_in_category: None,
                pass_threshold: None,
                xp_min: Some(200),
                xp_max: None,
            },
        )
        .await
        .expect_err("min above stored max must be rejected");
    assert!(matches!(
        err,
        codedonki_backend::error::Error::BadRequest(_)
    ));

    let req = Request::builder()
        .method("GET")
        .uri("/api/leaderboard")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Unauthenticated requests are rejected before reaching handlers.
    let req = Request::builder()
        .method("GET")
        .uri("/api/leaderboard")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
