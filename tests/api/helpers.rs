use std::net::TcpListener;
use std::sync::Arc;

use reqwest::Response;
use uuid::Uuid;

use milk_delivery::startup::run;
use milk_delivery::storage::{InMemorySubscriptionStore, SubscriptionStore};

pub struct TestApp {
    pub address: String,
    client: reqwest::Client,
}

/// Identity an upstream gateway would attach to every request.
pub struct TestUser {
    pub user_id: Uuid,
    pub role: &'static str,
}

impl TestUser {
    pub fn customer() -> TestUser {
        TestUser {
            user_id: Uuid::new_v4(),
            role: "customer",
        }
    }

    pub fn seller() -> TestUser {
        TestUser {
            user_id: Uuid::new_v4(),
            role: "seller",
        }
    }
}

impl TestApp {
    pub fn spawn_app() -> TestApp {
        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let store: Arc<dyn SubscriptionStore> = Arc::new(InMemorySubscriptionStore::new());
        let server = run(listener, store).expect("Failed to bind address");

        tokio::spawn(server);

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        }
    }

    pub async fn post_subscription(&self, user: &TestUser, body: &serde_json::Value) -> Response {
        self.client
            .post(format!("{}/subscriptions", self.address))
            .header("X-User-Id", user.user_id.to_string())
            .header("X-User-Role", user.role)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_my_subscriptions(&self, user: &TestUser) -> Response {
        self.client
            .get(format!("{}/subscriptions", self.address))
            .header("X-User-Id", user.user_id.to_string())
            .header("X-User-Role", user.role)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_active_subscription(&self, user: &TestUser) -> Response {
        self.client
            .get(format!("{}/subscriptions/active", self.address))
            .header("X-User-Id", user.user_id.to_string())
            .header("X-User-Role", user.role)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn toggle_pause(
        &self,
        user: &TestUser,
        subscription_id: &str,
        body: &serde_json::Value,
    ) -> Response {
        self.client
            .post(format!(
                "{}/subscriptions/{}/pause",
                self.address, subscription_id
            ))
            .header("X-User-Id", user.user_id.to_string())
            .header("X-User-Role", user.role)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn cancel_subscription(&self, user: &TestUser, subscription_id: &str) -> Response {
        self.client
            .put(format!(
                "{}/subscriptions/{}/cancel",
                self.address, subscription_id
            ))
            .header("X-User-Id", user.user_id.to_string())
            .header("X-User-Role", user.role)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_all_subscriptions(&self, user: &TestUser) -> Response {
        self.client
            .get(format!("{}/subscriptions/all", self.address))
            .header("X-User-Id", user.user_id.to_string())
            .header("X-User-Role", user.role)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_daily_summary(&self, user: &TestUser, date: Option<&str>) -> Response {
        let mut request = self
            .client
            .get(format!("{}/deliveries/summary", self.address))
            .header("X-User-Id", user.user_id.to_string())
            .header("X-User-Role", user.role);

        if let Some(date) = date {
            request = request.query(&[("date", date)]);
        }

        request.send().await.expect("Failed to execute request.")
    }
}

/// Five delivery days starting 2024-01-01, so the end date is 2024-01-05
/// while nothing is paused.
pub fn valid_subscription_body() -> serde_json::Value {
    serde_json::json!({
        "milk_type": "cow",
        "quantity": 2.0,
        "price_per_liter": 1.5,
        "total_days": 5,
        "start_date": "2024-01-01"
    })
}

pub async fn create_subscription_id(
    test_app: &TestApp,
    user: &TestUser,
    body: &serde_json::Value,
) -> String {
    let response = test_app.post_subscription(user, body).await;

    assert_eq!(201, response.status().as_u16());

    let subscription: serde_json::Value = response.json().await.unwrap();

    subscription["id"].as_str().unwrap().to_string()
}
