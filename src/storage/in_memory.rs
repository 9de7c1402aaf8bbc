use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::delivery_period::PauseAction;
use crate::domain::new_subscription::NewSubscription;
use crate::domain::subscription::Subscription;
use crate::domain::subscription_status::SubscriptionStatus;
use crate::storage::{StoreError, SubscriptionStore};

/// In-memory store for tests and local runs.
///
/// A single `RwLock` over the record map gives the exclusive hold the trait
/// contract asks for: both `insert` and `toggle_pause` run their whole
/// read-modify-write under the write lock.
pub struct InMemorySubscriptionStore {
    records: RwLock<HashMap<Uuid, Subscription>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn insert(&self, new_subscription: NewSubscription) -> Result<Subscription, StoreError> {
        let mut records = self
            .records
            .write()
            .expect("InMemorySubscriptionStore: records lock poisoned");

        let has_active = records.values().any(|subscription| {
            subscription.customer_id == new_subscription.customer_id
                && subscription.status.is_active()
        });

        if has_active {
            return Err(StoreError::AlreadyActive);
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            customer_id: new_subscription.customer_id,
            milk_type: new_subscription.milk_type,
            quantity: new_subscription.quantity,
            price_per_liter: new_subscription.price_per_liter,
            total_days: new_subscription.total_days,
            start_date: new_subscription.start_date,
            paused_dates: BTreeSet::new(),
            status: SubscriptionStatus::Active,
            created_at: Utc::now(),
        };

        records.insert(subscription.id, subscription.clone());

        Ok(subscription)
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Subscription>, StoreError> {
        let records = self
            .records
            .read()
            .expect("InMemorySubscriptionStore: records lock poisoned");

        let mut subscriptions: Vec<Subscription> = records
            .values()
            .filter(|subscription| subscription.customer_id == customer_id)
            .cloned()
            .collect();

        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(subscriptions)
    }

    async fn active_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<Subscription>, StoreError> {
        let records = self
            .records
            .read()
            .expect("InMemorySubscriptionStore: records lock poisoned");

        Ok(records
            .values()
            .find(|subscription| {
                subscription.customer_id == customer_id && subscription.status.is_active()
            })
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, StoreError> {
        let records = self
            .records
            .read()
            .expect("InMemorySubscriptionStore: records lock poisoned");

        let mut subscriptions: Vec<Subscription> = records.values().cloned().collect();

        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(subscriptions)
    }

    async fn list_active(&self) -> Result<Vec<Subscription>, StoreError> {
        let records = self
            .records
            .read()
            .expect("InMemorySubscriptionStore: records lock poisoned");

        Ok(records
            .values()
            .filter(|subscription| subscription.status.is_active())
            .cloned()
            .collect())
    }

    async fn toggle_pause(
        &self,
        subscription_id: Uuid,
        customer_id: Uuid,
        date: NaiveDate,
    ) -> Result<(PauseAction, Subscription), StoreError> {
        let mut records = self
            .records
            .write()
            .expect("InMemorySubscriptionStore: records lock poisoned");

        let subscription = records
            .get_mut(&subscription_id)
            .filter(|subscription| subscription.customer_id == customer_id)
            .ok_or(StoreError::NotFound)?;

        if !subscription.status.is_active() {
            return Err(StoreError::NotActive);
        }

        // Range membership is checked against the pre-toggle end date; the
        // toggle itself may move the boundary.
        if !subscription.is_date_in_range(date) {
            return Err(StoreError::OutOfRange(date));
        }

        let action = subscription.toggle_pause(date);

        Ok((action, subscription.clone()))
    }

    async fn cancel(
        &self,
        subscription_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Subscription, StoreError> {
        let mut records = self
            .records
            .write()
            .expect("InMemorySubscriptionStore: records lock poisoned");

        let subscription = records
            .get_mut(&subscription_id)
            .filter(|subscription| subscription.customer_id == customer_id)
            .ok_or(StoreError::NotFound)?;

        subscription.status = SubscriptionStatus::Cancelled;

        Ok(subscription.clone())
    }
}
