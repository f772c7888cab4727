//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration as ChronoDuration, Utc};
use http_body_util::BodyExt;
use serde_json::json;
use tally_core::db::Database;
use tally_core::limits::PurgePolicy;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    setup_test_app_with_config(ServerConfig::default())
}

fn setup_test_app_with_config(config: ServerConfig) -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, None, config)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn get_with_token(app: &Router, uri: &str, token: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Register "alice" and log her in, returning the session token
async fn register_and_login(app: &Router) -> String {
    let response = post_json(
        app,
        "/api/register",
        None,
        json!({"username": "alice", "password": "a-strong-password"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app,
        "/api/login",
        None,
        json!({"username": "alice", "password": "a-strong-password"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

async fn add_expense(app: &Router, token: &str, amount: &str, date: &str, description: &str) {
    let response = post_json(
        app,
        "/api/expenses",
        Some(token),
        json!({"amount": amount, "date": date, "description": description}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

fn today_string() -> String {
    Utc::now().date_naive().to_string()
}

fn yesterday_string() -> String {
    (Utc::now().date_naive() - ChronoDuration::days(1)).to_string()
}

// ========== Auth Tests ==========

#[tokio::test]
async fn test_register_login_me() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = get_with_token(&app, "/api/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["username"], "alice");
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = setup_test_app();

    let body = json!({"username": "alice", "password": "a-strong-password"});
    let response = post_json(&app, "/api/register", None, body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/api/register", None, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let app = setup_test_app();
    let response = post_json(
        &app,
        "/api/register",
        None,
        json!({"username": "alice", "password": "short"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let app = setup_test_app();
    register_and_login(&app).await;

    let response = post_json(
        &app,
        "/api/login",
        None,
        json!({"username": "alice", "password": "wrong-password"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = setup_test_app();
    post_json(
        &app,
        "/api/register",
        None,
        json!({"username": "alice", "password": "a-strong-password"}),
    )
    .await;

    let response = post_json(
        &app,
        "/api/login",
        None,
        json!({"username": "alice", "password": "a-strong-password"}),
    )
    .await;

    let cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("tally_session="));
    assert!(cookie.contains("HttpOnly"));

    // The cookie itself authenticates requests
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .header("cookie", cookie.split(';').next().unwrap())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = setup_test_app();

    for uri in ["/api/me", "/api/expenses", "/api/dashboard", "/api/analytics"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = post_json(&app, "/api/logout", Some(&token), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_token(&app, "/api/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ========== Expense Tests ==========

#[tokio::test]
async fn test_create_and_list_expenses() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "10.00", "2024-01-01", "food").await;
    add_expense(&app, &token, "5.50", "2024-01-01", "food").await;

    let response = get_with_token(&app, "/api/expenses", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["total"], 2);
    let expenses = json["expenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    // Amounts serialize as exact decimal strings
    assert_eq!(expenses[0]["amount"], "10.00");
}

#[tokio::test]
async fn test_expense_amount_validation() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    for bad in ["abc", "-5.00", "0", "1.999", ""] {
        let response = post_json(
            &app,
            "/api/expenses",
            Some(&token),
            json!({"amount": bad, "date": "2024-01-01"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "amount={bad:?}");
    }
}

#[tokio::test]
async fn test_expense_defaults_to_today_and_empty_description() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = post_json(&app, "/api/expenses", Some(&token), json!({"amount": "3.25"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_token(&app, "/api/expenses", &token).await;
    let json = get_body_json(response).await;
    let expense = &json["expenses"][0];
    assert_eq!(expense["date"], today_string());
    assert_eq!(expense["description"], "");
}

// ========== Dashboard Tests ==========

#[tokio::test]
async fn test_dashboard_without_limit() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "100.00", &today_string(), "splurge").await;

    let response = get_with_token(&app, "/api/dashboard?show_balance=1", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    // No limit set: never exceeded, no balance, regardless of the total
    assert_eq!(json["total_today"], "100.00");
    assert_eq!(json["limit_exceeded"], false);
    assert!(json.get("balance").is_none());
    assert!(json.get("daily_limit").is_none());
}

#[tokio::test]
async fn test_dashboard_total_today_ignores_other_days() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "10.00", &today_string(), "coffee").await;
    add_expense(&app, &token, "5.50", &today_string(), "lunch").await;
    add_expense(&app, &token, "99.00", &yesterday_string(), "old").await;

    let response = get_with_token(&app, "/api/dashboard", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["total_today"], "15.50");
}

#[tokio::test]
async fn test_limit_equal_spend_is_not_exceeded() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "20.00", &today_string(), "exact").await;

    let response = post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "20.00"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["dashboard"]["limit_exceeded"], false);
    assert_eq!(json["dashboard"]["total_today"], "20.00");

    // One more cent tips it over
    add_expense(&app, &token, "0.01", &today_string(), "straw").await;

    let response = get_with_token(&app, "/api/dashboard", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["total_today"], "20.01");
    assert_eq!(json["limit_exceeded"], true);
}

#[tokio::test]
async fn test_balance_only_when_requested() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "5.00", &today_string(), "coffee").await;
    post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "20.00"}),
    )
    .await;

    let response = get_with_token(&app, "/api/dashboard", &token).await;
    let json = get_body_json(response).await;
    assert!(json.get("balance").is_none());

    let response = get_with_token(&app, "/api/dashboard?show_balance=1", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["balance"], "15.00");
}

#[tokio::test]
async fn test_balance_can_go_negative() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "10.00"}),
    )
    .await;
    add_expense(&app, &token, "15.50", &today_string(), "overrun").await;

    let response = get_with_token(&app, "/api/dashboard?show_balance=1", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["limit_exceeded"], true);
    assert_eq!(json["balance"], "-5.50");
}

#[tokio::test]
async fn test_show_expenses_toggle() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "5.00", &today_string(), "coffee").await;

    let response = get_with_token(&app, "/api/dashboard", &token).await;
    let json = get_body_json(response).await;
    assert!(json.get("expenses_today").is_none());

    let response = get_with_token(&app, "/api/dashboard?show_expenses=1", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["expenses_today"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_limit_purges_history_preserving_today() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "8.00", &yesterday_string(), "old").await;
    add_expense(&app, &token, "4.00", &today_string(), "new").await;

    let response = post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "25.00"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["purged"], 1);
    assert_eq!(json["dashboard"]["total_today"], "4.00");
    assert_eq!(json["dashboard"]["daily_limit"], "25.00");
    assert_eq!(json["dashboard"]["limit_set_date"], today_string());

    // Only today's expense survives
    let response = get_with_token(&app, "/api/expenses", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["expenses"][0]["description"], "new");
}

#[tokio::test]
async fn test_keep_all_policy_purges_nothing() {
    let config = ServerConfig {
        purge_policy: PurgePolicy::KeepAll,
        ..Default::default()
    };
    let app = setup_test_app_with_config(config);
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "8.00", &yesterday_string(), "old").await;

    let response = post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "25.00"}),
    )
    .await;
    let json = get_body_json(response).await;
    assert_eq!(json["purged"], 0);

    let response = get_with_token(&app, "/api/expenses", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["total"], 1);
}

#[tokio::test]
async fn test_purge_all_policy_clears_today_too() {
    let config = ServerConfig {
        purge_policy: PurgePolicy::PurgeAll,
        ..Default::default()
    };
    let app = setup_test_app_with_config(config);
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "8.00", &yesterday_string(), "old").await;
    add_expense(&app, &token, "4.00", &today_string(), "new").await;

    let response = post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "25.00"}),
    )
    .await;
    let json = get_body_json(response).await;
    assert_eq!(json["purged"], 2);
    // Summary is computed after the purge: nothing left today
    assert_eq!(json["dashboard"]["total_today"], "0");
}

#[tokio::test]
async fn test_set_limit_replaces_previous() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "10.00"}),
    )
    .await;
    let response = post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "30.00"}),
    )
    .await;

    let json = get_body_json(response).await;
    assert_eq!(json["dashboard"]["daily_limit"], "30.00");
}

#[tokio::test]
async fn test_set_limit_invalid_amount_mutates_nothing() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "8.00", &yesterday_string(), "old").await;

    let response = post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "not-a-number"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Validation failed before the purge: history intact, no limit set
    let response = get_with_token(&app, "/api/expenses", &token).await;
    let json = get_body_json(response).await;
    assert_eq!(json["total"], 1);

    let response = get_with_token(&app, "/api/dashboard", &token).await;
    let json = get_body_json(response).await;
    assert!(json.get("daily_limit").is_none());
}

// ========== Analytics Tests ==========

#[tokio::test]
async fn test_analytics_series_without_limit() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "10.00", "2024-01-01", "food").await;
    add_expense(&app, &token, "5.50", "2024-01-01", "food").await;
    add_expense(&app, &token, "3.00", "2024-01-02", "transport").await;

    let response = get_with_token(&app, "/api/analytics", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["total_spent"], "18.50");
    assert!(json.get("since").is_none());

    assert_eq!(
        json["category_series"]["labels"],
        json!(["food", "transport"])
    );
    assert_eq!(json["category_series"]["values"], json!(["15.50", "3.00"]));

    assert_eq!(
        json["date_series"]["labels"],
        json!(["2024-01-01", "2024-01-02"])
    );
    assert_eq!(json["date_series"]["values"], json!(["15.50", "3.00"]));
}

#[tokio::test]
async fn test_analytics_keeps_empty_description_category() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "2.00", "2024-01-01", "").await;
    add_expense(&app, &token, "3.00", "2024-01-01", "coffee").await;
    add_expense(&app, &token, "1.50", "2024-01-02", "").await;

    let response = get_with_token(&app, "/api/analytics", &token).await;
    let json = get_body_json(response).await;

    assert_eq!(json["category_series"]["labels"], json!(["", "coffee"]));
    assert_eq!(json["category_series"]["values"], json!(["3.50", "3.00"]));
}

#[tokio::test]
async fn test_analytics_filters_from_limit_set_date() {
    // keep-all so history survives the limit submission and the window
    // filter is what hides it
    let config = ServerConfig {
        purge_policy: PurgePolicy::KeepAll,
        ..Default::default()
    };
    let app = setup_test_app_with_config(config);
    let token = register_and_login(&app).await;

    add_expense(&app, &token, "50.00", &yesterday_string(), "before").await;
    add_expense(&app, &token, "4.00", &today_string(), "after").await;

    post_json(
        &app,
        "/api/dashboard/limit",
        Some(&token),
        json!({"amount": "25.00"}),
    )
    .await;

    let response = get_with_token(&app, "/api/analytics", &token).await;
    let json = get_body_json(response).await;

    assert_eq!(json["since"], today_string());
    assert_eq!(json["total_spent"], "4.00");
    assert_eq!(json["category_series"]["labels"], json!(["after"]));
}

#[tokio::test]
async fn test_analytics_empty_history() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = get_with_token(&app, "/api/analytics", &token).await;
    let json = get_body_json(response).await;

    assert_eq!(json["total_spent"], "0");
    assert_eq!(json["category_series"]["labels"], json!([]));
    assert_eq!(json["date_series"]["labels"], json!([]));
}

// ========== Budget & Goal Tests ==========

#[tokio::test]
async fn test_budget_create_and_list() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = post_json(
        &app,
        "/api/budgets",
        Some(&token),
        json!({"amount": "500.00", "month": "2024-06-15"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_token(&app, "/api/budgets", &token).await;
    let json = get_body_json(response).await;
    let budgets = json.as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["amount"], "500.00");
    // Month normalized to the first of the month
    assert_eq!(budgets[0]["month"], "2024-06-01");
}

#[tokio::test]
async fn test_goal_create_and_progress() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = post_json(
        &app,
        "/api/goals",
        Some(&token),
        json!({"name": "Emergency fund", "target_amount": "1000.00", "deadline": "2024-12-31"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let goal_id = get_body_json(response).await["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        &format!("/api/goals/{}/progress", goal_id),
        Some(&token),
        json!({"amount": "250.50"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["current_amount"], "250.50");
    assert_eq!(json["target_amount"], "1000.00");
}

#[tokio::test]
async fn test_goal_progress_unknown_goal_is_404() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = post_json(
        &app,
        "/api/goals/999/progress",
        Some(&token),
        json!({"amount": "10.00"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Isolation Tests ==========

#[tokio::test]
async fn test_users_cannot_see_each_other() {
    let app = setup_test_app();
    let alice = register_and_login(&app).await;

    post_json(
        &app,
        "/api/register",
        None,
        json!({"username": "bob", "password": "another-password"}),
    )
    .await;
    let response = post_json(
        &app,
        "/api/login",
        None,
        json!({"username": "bob", "password": "another-password"}),
    )
    .await;
    let bob = get_body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    add_expense(&app, &alice, "10.00", "2024-01-01", "alice's").await;

    let response = get_with_token(&app, "/api/expenses", &bob).await;
    let json = get_body_json(response).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_daily_limit_is_session_scoped() {
    let app = setup_test_app();
    let first = register_and_login(&app).await;

    // Second login, second session for the same user
    let response = post_json(
        &app,
        "/api/login",
        None,
        json!({"username": "alice", "password": "a-strong-password"}),
    )
    .await;
    let second = get_body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    post_json(
        &app,
        "/api/dashboard/limit",
        Some(&first),
        json!({"amount": "20.00"}),
    )
    .await;

    let response = get_with_token(&app, "/api/dashboard", &first).await;
    let json = get_body_json(response).await;
    assert_eq!(json["daily_limit"], "20.00");

    // The other session never set a limit
    let response = get_with_token(&app, "/api/dashboard", &second).await;
    let json = get_body_json(response).await;
    assert!(json.get("daily_limit").is_none());
}
