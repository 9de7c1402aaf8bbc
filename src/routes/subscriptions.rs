use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AuthError, Caller};
use crate::domain::delivery_period::{parse_delivery_date, PauseAction};
use crate::domain::new_subscription::{NewSubscription, NewSubscriptionBody};
use crate::domain::subscription::Subscription;
use crate::storage::{StoreError, SubscriptionStore};

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl std::fmt::Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for SubscriptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            SubscriptionError::Store(StoreError::AlreadyActive) => StatusCode::CONFLICT,
            SubscriptionError::Store(StoreError::NotActive) => StatusCode::CONFLICT,
            SubscriptionError::Store(StoreError::OutOfRange(_)) => StatusCode::BAD_REQUEST,
            SubscriptionError::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            SubscriptionError::Auth(err) => err.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "message": self.to_string() }))
    }
}

#[tracing::instrument(
    name = "Creating a new subscription handler",
    skip(body, store),
    fields(
        customer_id = %caller.user_id,
        milk_type = %body.milk_type
    )
)]
pub async fn handle_create_subscription(
    caller: Caller,
    body: web::Json<NewSubscriptionBody>,
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionError> {
    let today = Utc::now().date_naive();
    let new_subscription = NewSubscription::parse(body.into_inner(), caller.user_id, today)
        .map_err(SubscriptionError::Validation)?;

    let subscription = store.insert(new_subscription).await?;

    Ok(HttpResponse::Created().json(subscription))
}

#[tracing::instrument(
    name = "Listing a customer's subscriptions handler",
    skip(store),
    fields(customer_id = %caller.user_id)
)]
pub async fn handle_my_subscriptions(
    caller: Caller,
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionError> {
    let subscriptions = store.list_for_customer(caller.user_id).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}

#[tracing::instrument(
    name = "Fetching a customer's active subscription handler",
    skip(store),
    fields(customer_id = %caller.user_id)
)]
pub async fn handle_active_subscription(
    caller: Caller,
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionError> {
    let subscription = store
        .active_for_customer(caller.user_id)
        .await?
        .ok_or(SubscriptionError::Store(StoreError::NotFound))?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[derive(Deserialize)]
pub struct TogglePauseBody {
    pub date: Option<String>,
}

#[derive(serde::Serialize)]
pub struct TogglePauseResponse {
    pub message: String,
    pub action: PauseAction,
    pub date: NaiveDate,
    pub subscription: Subscription,
}

#[tracing::instrument(
    name = "Toggling a paused delivery date handler",
    skip(body, store),
    fields(
        customer_id = %caller.user_id,
        subscription_id = %subscription_id
    )
)]
pub async fn handle_toggle_pause(
    caller: Caller,
    subscription_id: web::Path<Uuid>,
    body: Option<web::Json<TogglePauseBody>>,
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionError> {
    // Deliveries are whole-day events: the toggled date defaults to today and
    // any caller-supplied time component is discarded during parsing.
    let date = match body.and_then(|body| body.into_inner().date) {
        Some(raw) => parse_delivery_date(&raw).map_err(SubscriptionError::Validation)?,
        None => Utc::now().date_naive(),
    };

    let (action, subscription) = store
        .toggle_pause(subscription_id.into_inner(), caller.user_id, date)
        .await?;

    Ok(HttpResponse::Ok().json(TogglePauseResponse {
        message: format!("Delivery {} for {}", action.as_ref(), date),
        action,
        date,
        subscription,
    }))
}

#[derive(serde::Serialize)]
pub struct CancelSubscriptionResponse {
    pub message: String,
    pub subscription: Subscription,
}

#[tracing::instrument(
    name = "Cancelling a subscription handler",
    skip(store),
    fields(
        customer_id = %caller.user_id,
        subscription_id = %subscription_id
    )
)]
pub async fn handle_cancel_subscription(
    caller: Caller,
    subscription_id: web::Path<Uuid>,
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionError> {
    let subscription = store
        .cancel(subscription_id.into_inner(), caller.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(CancelSubscriptionResponse {
        message: String::from("Subscription cancelled successfully"),
        subscription,
    }))
}

#[tracing::instrument(
    name = "Listing all subscriptions handler",
    skip(store),
    fields(user_id = %caller.user_id)
)]
pub async fn handle_all_subscriptions(
    caller: Caller,
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, SubscriptionError> {
    caller.require_seller()?;

    let subscriptions = store.list_all().await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}
