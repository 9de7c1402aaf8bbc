pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemorySubscriptionStore;
pub use postgres::PgSubscriptionStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::delivery_period::PauseAction;
use crate::domain::new_subscription::NewSubscription;
use crate::domain::subscription::Subscription;

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("You already have an active subscription. Please cancel or wait for it to complete.")]
    AlreadyActive,
    #[error("Subscription not found.")]
    NotFound,
    #[error("Subscription is not active.")]
    NotActive,
    #[error("{0} is outside the subscription period.")]
    OutOfRange(NaiveDate),
    #[error("Failed to execute a storage query.")]
    Database(#[from] sqlx::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

/// Persistence collaborator for subscriptions.
///
/// Implementations must serialize the two read-modify-write operations:
/// - `insert` checks the one-active-subscription-per-customer rule at write
///   time, under the same exclusive hold as the insert itself.
/// - `toggle_pause` performs read, validation and toggle on an exclusively
///   held record, validating range membership against the pre-toggle end date.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn insert(&self, new_subscription: NewSubscription) -> Result<Subscription, StoreError>;

    /// Caller's subscriptions, newest first.
    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Subscription>, StoreError>;

    async fn active_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Every subscription regardless of status, newest first.
    async fn list_all(&self) -> Result<Vec<Subscription>, StoreError>;

    async fn list_active(&self) -> Result<Vec<Subscription>, StoreError>;

    async fn toggle_pause(
        &self,
        subscription_id: Uuid,
        customer_id: Uuid,
        date: NaiveDate,
    ) -> Result<(PauseAction, Subscription), StoreError>;

    async fn cancel(
        &self,
        subscription_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Subscription, StoreError>;
}
