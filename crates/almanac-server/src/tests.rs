//! Server API tests

use super::*;
use almanac_core::test_utils::{date, LedgerBuilder, USER_ID};
use almanac_core::EngineConfig;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn test_calendar() -> HolidayCalendar {
    HolidayCalendar::from_json_str(
        r#"[
            {"id": 1, "country_code": "US", "name": "Christmas Day", "date": "2023-12-25", "type": "public", "tags": ["christian"]},
            {"id": 2, "country_code": "US", "name": "Christmas Day", "date": "2024-12-25", "type": "public", "tags": ["christian"]},
            {"id": 3, "country_code": "US", "name": "Thanksgiving Day", "date": "2024-11-28", "type": "public", "tags": ["harvest"]},
            {"id": 4, "country_code": "GB", "name": "Boxing Day", "date": "2024-12-26", "type": "public"}
        ]"#,
    )
    .unwrap()
}

fn setup_test_app() -> Router {
    create_router(
        Engine::new(EngineConfig::default()),
        test_calendar(),
        ServerConfig::default(),
    )
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Steady Food spend with a Gifts lift before Christmas 2023
fn seasonal_transactions() -> serde_json::Value {
    let transactions = LedgerBuilder::new()
        .daily(date(2023, 6, 1), date(2024, 11, 20), "Food", 10.0)
        .lift(date(2023, 12, 25), 7, "Gifts", 5.0)
        .transactions();
    serde_json::to_value(transactions).unwrap()
}

// ========== Health Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// ========== Stats Tests ==========

#[tokio::test]
async fn test_transaction_stats() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "transactions": [
            {"id": 1, "user_id": 1, "description": "Groceries", "amount": 100.0,
             "category": "Food", "type": "expense", "date": "2024-01-05T10:00:00"},
            {"id": 2, "user_id": 1, "description": "Paycheck", "amount": 50.0,
             "category": "Salary", "type": "income", "date": "2024-02-01"}
        ]
    });

    let response = app
        .oneshot(post_json("/api/stats/transactions", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["total_expenses"], 100.0);
    assert_eq!(json["total_income"], 50.0);
    assert_eq!(json["net_income"], -50.0);
    assert_eq!(json["transactions_count"], 2);
    assert_eq!(json["category_breakdown"]["Food"], 100.0);
    assert_eq!(json["monthly_summary"]["2024-01"]["expenses"], 100.0);
    assert_eq!(json["monthly_summary"]["2024-02"]["income"], 50.0);
}

#[tokio::test]
async fn test_transaction_stats_with_range_and_foreign_rows() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "from": "2024-02-01",
        "transactions": [
            {"id": 1, "user_id": 1, "amount": 100.0, "category": "Food", "type": "expense", "date": "2024-01-05"},
            {"id": 2, "user_id": 1, "amount": 20.0, "category": "Food", "type": "expense", "date": "2024-02-05"},
            {"id": 3, "user_id": 2, "amount": 999.0, "category": "Food", "type": "expense", "date": "2024-02-06"}
        ]
    });

    let response = app
        .oneshot(post_json("/api/stats/transactions", &body))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["total_expenses"], 20.0);
    assert_eq!(json["transactions_count"], 1);
}

#[tokio::test]
async fn test_transaction_stats_rejects_negative_amount() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "transactions": [
            {"id": 9, "user_id": 1, "amount": -5.0, "category": "Food", "type": "expense", "date": "2024-01-05"}
        ]
    });

    let response = app
        .oneshot(post_json("/api/stats/transactions", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("transaction 9"));
}

#[tokio::test]
async fn test_transaction_stats_rejects_unknown_type() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "transactions": [
            {"id": 1, "user_id": 1, "amount": 5.0, "category": "Food", "type": "transfer", "date": "2024-01-05"}
        ]
    });

    let response = app
        .oneshot(post_json("/api/stats/transactions", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_transaction_stats_invalid_date_param() {
    let app = setup_test_app();

    let body = serde_json::json!({"user_id": 1, "transactions": [], "from": "01/02/2024"});

    let response = app
        .oneshot(post_json("/api/stats/transactions", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Budget Tests ==========

#[tokio::test]
async fn test_budget_progress_statuses() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "budgets": [
            {"id": 1, "user_id": 1, "category": "Food", "amount": 100.0, "period": "monthly"},
            {"id": 2, "user_id": 1, "category": "Fun", "amount": 100.0, "period": "monthly"},
            {"id": 3, "user_id": 1, "category": "Rent", "amount": 0.0, "period": "monthly"}
        ],
        "transactions": [
            {"id": 1, "user_id": 1, "amount": 80.0, "category": "Food", "type": "expense", "date": "2024-03-02"},
            {"id": 2, "user_id": 1, "amount": 150.0, "category": "Fun", "type": "expense", "date": "2024-03-03"},
            {"id": 3, "user_id": 1, "amount": 10.0, "category": "Rent", "type": "expense", "date": "2024-03-03"}
        ]
    });

    let response = app
        .oneshot(post_json("/api/budgets/progress", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);

    assert_eq!(items[0]["budget_id"], 1);
    assert_eq!(items[0]["progress_pct"], 80.0);
    assert_eq!(items[0]["status"], "near_limit");
    assert!(items[0]["over_by"].is_null());

    assert_eq!(items[1]["progress_pct"], 100.0);
    assert_eq!(items[1]["remaining"], -50.0);
    assert_eq!(items[1]["over_by"], 50.0);
    assert_eq!(items[1]["status"], "over_budget");

    assert_eq!(items[2]["progress_pct"], 0.0);
    assert_eq!(items[2]["status"], "on_track");
    assert!(items[2]["error"].is_string());
}

#[tokio::test]
async fn test_budget_progress_as_of_windows_period() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "as_of": "2024-04-10",
        "budgets": [
            {"id": 1, "user_id": 1, "category": "Food", "amount": 100.0, "period": "monthly"}
        ],
        "transactions": [
            {"id": 1, "user_id": 1, "amount": 80.0, "category": "Food", "type": "expense", "date": "2024-03-02"},
            {"id": 2, "user_id": 1, "amount": 30.0, "category": "Food", "type": "expense", "date": "2024-04-02"}
        ]
    });

    let response = app
        .oneshot(post_json("/api/budgets/progress", &body))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json[0]["spent"], 30.0);
    assert_eq!(json[0]["status"], "on_track");
}

// ========== Holiday Tests ==========

#[tokio::test]
async fn test_list_holidays() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/holidays?country=US&from=2024-11-01&to=2024-12-31")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let events = json.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["name"], "Thanksgiving Day");
    assert_eq!(events[1]["type"], "public");
}

#[tokio::test]
async fn test_list_holidays_invalid_date() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/holidays?from=yesterday")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_holidays_from_at_end_of_calendar_range() {
    let app = setup_test_app();

    // No default end date exists 31 days past this one
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/holidays?from=%2B262142-12-25")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_holiday_insights_from_server_calendar() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": USER_ID,
        "transactions": seasonal_transactions(),
        "as_of": "2024-11-25",
        "country_code": "US"
    });

    let response = app
        .oneshot(post_json("/api/insights/holidays", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let insights = json.as_array().unwrap();
    assert_eq!(insights.len(), 2);

    // Ordered by date
    assert_eq!(insights[0]["holiday_name"], "Thanksgiving Day");
    assert_eq!(insights[0]["status"], "insufficient_data");
    assert!(insights[0]["expected_change_pct"].is_null());
    assert!(insights[0]["confidence"].is_null());

    assert_eq!(insights[1]["holiday_name"], "Christmas Day");
    assert_eq!(insights[1]["status"], "ok");
    assert_eq!(insights[1]["expected_change_pct"], 50.0);
    assert_eq!(insights[1]["confidence"], "low");
    assert_eq!(insights[1]["recommended_adjustment_pct"], 25.0);
    assert_eq!(insights[1]["top_categories"][0]["category"], "Gifts");
}

#[tokio::test]
async fn test_holiday_insights_with_request_holidays_and_tags() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": USER_ID,
        "transactions": seasonal_transactions(),
        "as_of": "2024-11-25",
        "culture_tags": ["harvest"],
        "holidays": [
            {"id": 10, "country_code": "US", "name": "Thanksgiving Day", "date": "2024-11-28", "tags": ["harvest"]},
            {"id": 11, "country_code": "US", "name": "Christmas Day", "date": "2024-12-25", "tags": ["christian"]}
        ]
    });

    let response = app
        .oneshot(post_json("/api/insights/holidays", &body))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    let insights = json.as_array().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0]["holiday_event_id"], 10);
}

#[tokio::test]
async fn test_holiday_insights_opt_out() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": USER_ID,
        "transactions": seasonal_transactions(),
        "as_of": "2024-11-25",
        "calendar_opt_in": false
    });

    let response = app
        .oneshot(post_json("/api/insights/holidays", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_holiday_insights_rejects_zero_pre_window() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": USER_ID,
        "transactions": [],
        "as_of": "2024-11-25",
        "pre_window_days": 0
    });

    let response = app
        .oneshot(post_json("/api/insights/holidays", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_holiday_insights_rejects_oversized_windows() {
    let app = setup_test_app();

    for field in ["window_days", "pre_window_days"] {
        let mut body = serde_json::json!({
            "user_id": USER_ID,
            "transactions": seasonal_transactions(),
            "as_of": "2024-11-25"
        });
        body[field] = serde_json::json!(4294967295u32);

        let response = app
            .clone()
            .oneshot(post_json("/api/insights/holidays", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", field);
        let json = get_body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains(field));
    }
}

// ========== Cache Tests ==========

#[tokio::test]
async fn test_invalidate_user_cache() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": USER_ID,
        "transactions": seasonal_transactions(),
        "as_of": "2024-11-25"
    });

    let response = app
        .clone()
        .oneshot(post_json("/api/insights/holidays", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/cache/users/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);
}

// ========== Error Mapping Tests ==========

#[test]
fn test_core_errors_map_to_status() {
    let invalid = AppError::from(almanac_core::Error::InvalidInput("bad".into()));
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing = AppError::from(almanac_core::Error::NotFound("user".into()));
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let io = AppError::from(almanac_core::Error::Io(std::io::Error::other("disk")));
    assert_eq!(io.status, StatusCode::INTERNAL_SERVER_ERROR);
}
