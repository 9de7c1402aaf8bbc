use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;

use crate::helpers::{create_subscription_id, valid_subscription_body, TestApp, TestUser};

#[tokio::test]
async fn create_returns_201_with_the_derived_end_date() {
    let test_app = TestApp::spawn_app();
    let customer = TestUser::customer();

    let response = test_app
        .post_subscription(&customer, &valid_subscription_body())
        .await;

    assert_eq!(201, response.status().as_u16());

    let subscription: serde_json::Value = response.json().await.unwrap();

    assert_eq!(subscription["milk_type"], "cow");
    assert_eq!(subscription["status"], "active");
    assert_eq!(subscription["start_date"], "2024-01-01");
    assert_eq!(subscription["end_date"], "2024-01-05");
    assert_eq!(subscription["paused_dates"], json!([]));
    assert_eq!(
        subscription["customer_id"],
        customer.user_id.to_string().as_str()
    );
}

#[tokio::test]
async fn create_without_start_date_begins_today() {
    let test_app = TestApp::spawn_app();
    let customer = TestUser::customer();
    let body = json!({
        "milk_type": "buffalo",
        "quantity": 1.0,
        "price_per_liter": 2.0,
        "total_days": 7
    });

    let response = test_app.post_subscription(&customer, &body).await;

    assert_eq!(201, response.status().as_u16());

    let subscription: serde_json::Value = response.json().await.unwrap();
    let start_date =
        NaiveDate::parse_from_str(subscription["start_date"].as_str().unwrap(), "%Y-%m-%d")
            .unwrap();
    let expected_end = start_date + Duration::days(6);

    assert_eq!(start_date, Utc::now().date_naive());
    assert_eq!(subscription["end_date"], expected_end.to_string().as_str());
}

#[tokio::test]
async fn create_returns_400_when_body_is_invalid() {
    let test_app = TestApp::spawn_app();
    let customer = TestUser::customer();

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases: Vec<(serde_json::Value, &str)> = vec![
        (json!({}), "missing body parameters"),
        (
            json!({"milk_type": "goat", "quantity": 1.0, "price_per_liter": 1.0, "total_days": 5}),
            "unknown milk type",
        ),
        (
            json!({"milk_type": "cow", "quantity": 0.0, "price_per_liter": 1.0, "total_days": 5}),
            "zero quantity",
        ),
        (
            json!({"milk_type": "cow", "quantity": 1.0, "price_per_liter": -1.0, "total_days": 5}),
            "negative price",
        ),
        (
            json!({"milk_type": "cow", "quantity": 1.0, "price_per_liter": 1.0, "total_days": 0}),
            "zero total days",
        ),
        (
            json!({"milk_type": "cow", "quantity": 1.0, "price_per_liter": 1.0, "total_days": 4294967295u32}),
            "total days beyond the maximum subscription length",
        ),
        (
            json!({"milk_type": "cow", "quantity": 1.0, "price_per_liter": 1.0, "total_days": 5, "start_date": "soon"}),
            "unparseable start date",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(&customer, &invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn a_second_active_subscription_is_rejected() {
    let test_app = TestApp::spawn_app();
    let customer = TestUser::customer();

    create_subscription_id(&test_app, &customer, &valid_subscription_body()).await;

    let response = test_app
        .post_subscription(&customer, &valid_subscription_body())
        .await;

    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn creation_succeeds_again_after_cancellation() {
    let test_app = TestApp::spawn_app();
    let customer = TestUser::customer();

    let subscription_id =
        create_subscription_id(&test_app, &customer, &valid_subscription_body()).await;

    let cancel_response = test_app
        .cancel_subscription(&customer, &subscription_id)
        .await;
    assert_eq!(200, cancel_response.status().as_u16());

    let cancelled: serde_json::Value = cancel_response.json().await.unwrap();
    assert_eq!(cancelled["subscription"]["status"], "cancelled");

    let response = test_app
        .post_subscription(&customer, &valid_subscription_body())
        .await;
    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn my_subscriptions_only_lists_the_callers_records() {
    let test_app = TestApp::spawn_app();
    let customer = TestUser::customer();
    let other_customer = TestUser::customer();

    let subscription_id =
        create_subscription_id(&test_app, &customer, &valid_subscription_body()).await;
    test_app
        .cancel_subscription(&customer, &subscription_id)
        .await;
    create_subscription_id(&test_app, &customer, &valid_subscription_body()).await;
    create_subscription_id(&test_app, &other_customer, &valid_subscription_body()).await;

    let response = test_app.get_my_subscriptions(&customer).await;

    assert_eq!(200, response.status().as_u16());

    let subscriptions: serde_json::Value = response.json().await.unwrap();

    assert_eq!(subscriptions.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn active_subscription_returns_404_when_none_is_active() {
    let test_app = TestApp::spawn_app();
    let customer = TestUser::customer();

    let response = test_app.get_active_subscription(&customer).await;
    assert_eq!(404, response.status().as_u16());

    let subscription_id =
        create_subscription_id(&test_app, &customer, &valid_subscription_body()).await;

    let response = test_app.get_active_subscription(&customer).await;
    assert_eq!(200, response.status().as_u16());

    test_app
        .cancel_subscription(&customer, &subscription_id)
        .await;

    let response = test_app.get_active_subscription(&customer).await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn cancelling_an_unknown_subscription_returns_404() {
    let test_app = TestApp::spawn_app();
    let customer = TestUser::customer();

    let response = test_app
        .cancel_subscription(&customer, &uuid::Uuid::new_v4().to_string())
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn requests_without_identity_headers_are_rejected() {
    let test_app = TestApp::spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/subscriptions", test_app.address))
        .json(&valid_subscription_body())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
}
