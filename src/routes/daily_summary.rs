use actix_web::http::StatusCode;
use actix_web::{
    web::{self, Query},
    HttpResponse, ResponseError,
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::{AuthError, Caller};
use crate::domain::daily_summary::DailySummary;
use crate::domain::delivery_period::parse_delivery_date;
use crate::storage::{StoreError, SubscriptionStore};

#[derive(Deserialize, Debug)]
pub struct SummaryParameters {
    pub date: Option<String>,
}

#[derive(thiserror::Error)]
pub enum DailySummaryError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Failed to get subscriptions from the database.")]
    Store(#[from] StoreError),
}

impl std::fmt::Debug for DailySummaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for DailySummaryError {
    fn status_code(&self) -> StatusCode {
        match self {
            DailySummaryError::Validation(_) => StatusCode::BAD_REQUEST,
            DailySummaryError::Auth(err) => err.status_code(),
            DailySummaryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "message": self.to_string() }))
    }
}

/// Seller view of one delivery day: who gets milk, who is paused and how many
/// liters of each type to prepare. The date defaults to today but any day,
/// past or future, can be asked for.
#[tracing::instrument(
    name = "Daily delivery summary handler",
    skip(store),
    fields(user_id = %caller.user_id)
)]
pub async fn handle_daily_summary(
    caller: Caller,
    parameters: Query<SummaryParameters>,
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, DailySummaryError> {
    caller.require_seller()?;

    let date = match &parameters.date {
        Some(raw) => parse_delivery_date(raw).map_err(DailySummaryError::Validation)?,
        None => Utc::now().date_naive(),
    };

    let active_subscriptions = store.list_active().await?;
    let summary = DailySummary::aggregate(active_subscriptions, date);

    Ok(HttpResponse::Ok().json(summary))
}
