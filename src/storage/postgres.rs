use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::delivery_period::PauseAction;
use crate::domain::milk_quantity::MilkQuantity;
use crate::domain::milk_type::MilkType;
use crate::domain::new_subscription::NewSubscription;
use crate::domain::price_per_liter::PricePerLiter;
use crate::domain::subscription::Subscription;
use crate::domain::subscription_status::SubscriptionStatus;
use crate::domain::total_days::TotalDays;
use crate::storage::{StoreError, SubscriptionStore};

const SUBSCRIPTION_COLUMNS: &str = "id, customer_id, milk_type, quantity, price_per_liter, \
     total_days, start_date, paused_dates, status, created_at";

pub struct PgSubscriptionStore {
    db_pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

fn subscription_from_row(row: &PgRow) -> Subscription {
    let paused_dates: Vec<NaiveDate> = row.get("paused_dates");

    Subscription {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        milk_type: MilkType::parse(row.get("milk_type")).unwrap(),
        quantity: MilkQuantity::parse(row.get("quantity")).unwrap(),
        price_per_liter: PricePerLiter::parse(row.get("price_per_liter")).unwrap(),
        total_days: TotalDays::parse(row.get::<i32, _>("total_days") as u32).unwrap(),
        start_date: row.get("start_date"),
        paused_dates: paused_dates.into_iter().collect(),
        status: SubscriptionStatus::parse(row.get("status")).unwrap(),
        created_at: row.get("created_at"),
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    // Backstop for concurrent creates racing past the FOR UPDATE check.
    if let sqlx::Error::Database(database_err) = &err {
        if database_err.constraint() == Some("one_active_subscription_per_customer") {
            return StoreError::AlreadyActive;
        }
    }

    StoreError::Database(err)
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    #[tracing::instrument(
        name = "Insert a new subscription into the database",
        skip(self, new_subscription),
        fields(customer_id = %new_subscription.customer_id)
    )]
    async fn insert(&self, new_subscription: NewSubscription) -> Result<Subscription, StoreError> {
        let mut tx = self.db_pool.begin().await?;

        let existing_active = sqlx::query(
            r#"
            SELECT id
            FROM subscriptions
            WHERE customer_id = $1 AND status = 'active'
            FOR UPDATE
            "#,
        )
        .bind(new_subscription.customer_id)
        .fetch_optional(&mut tx)
        .await?;

        if existing_active.is_some() {
            return Err(StoreError::AlreadyActive);
        }

        let subscription = sqlx::query(&format!(
            r#"
            INSERT INTO subscriptions
                (id, customer_id, milk_type, quantity, price_per_liter,
                 total_days, start_date, paused_dates, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, '{{}}', $8, $9)
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(new_subscription.customer_id)
        .bind(new_subscription.milk_type.as_ref())
        .bind(new_subscription.quantity.as_f64())
        .bind(new_subscription.price_per_liter.as_f64())
        .bind(new_subscription.total_days.as_u32() as i32)
        .bind(new_subscription.start_date)
        .bind(SubscriptionStatus::Active.as_ref())
        .bind(Utc::now())
        .map(|row: PgRow| subscription_from_row(&row))
        .fetch_one(&mut tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;

        Ok(subscription)
    }

    #[tracing::instrument(name = "Fetch a customer's subscriptions", skip(self))]
    async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Subscription>, StoreError> {
        let subscriptions = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE customer_id = $1 ORDER BY created_at DESC",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(customer_id)
        .map(|row: PgRow| subscription_from_row(&row))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Fetch a customer's active subscription", skip(self))]
    async fn active_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<Subscription>, StoreError> {
        let subscription = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE customer_id = $1 AND status = 'active'",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(customer_id)
        .map(|row: PgRow| subscription_from_row(&row))
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(subscription)
    }

    #[tracing::instrument(name = "Fetch all subscriptions", skip(self))]
    async fn list_all(&self) -> Result<Vec<Subscription>, StoreError> {
        let subscriptions = sqlx::query(&format!(
            "SELECT {} FROM subscriptions ORDER BY created_at DESC",
            SUBSCRIPTION_COLUMNS
        ))
        .map(|row: PgRow| subscription_from_row(&row))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Fetch all active subscriptions", skip(self))]
    async fn list_active(&self) -> Result<Vec<Subscription>, StoreError> {
        let subscriptions = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE status = 'active'",
            SUBSCRIPTION_COLUMNS
        ))
        .map(|row: PgRow| subscription_from_row(&row))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(subscriptions)
    }

    #[tracing::instrument(
        name = "Toggle a paused date on a subscription",
        skip(self),
        fields(date = %date)
    )]
    async fn toggle_pause(
        &self,
        subscription_id: Uuid,
        customer_id: Uuid,
        date: NaiveDate,
    ) -> Result<(PauseAction, Subscription), StoreError> {
        let mut tx = self.db_pool.begin().await?;

        // FOR UPDATE keeps the record exclusively held for the whole
        // read-validate-toggle-write sequence.
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1 AND customer_id = $2 FOR UPDATE",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(subscription_id)
        .bind(customer_id)
        .fetch_optional(&mut tx)
        .await?;

        let mut subscription = match row {
            Some(row) => subscription_from_row(&row),
            None => return Err(StoreError::NotFound),
        };

        if !subscription.status.is_active() {
            return Err(StoreError::NotActive);
        }

        // Validated against the pre-toggle end date.
        if !subscription.is_date_in_range(date) {
            return Err(StoreError::OutOfRange(date));
        }

        let action = subscription.toggle_pause(date);
        let paused_dates: Vec<NaiveDate> = subscription.paused_dates.iter().copied().collect();

        sqlx::query("UPDATE subscriptions SET paused_dates = $1 WHERE id = $2")
            .bind(paused_dates)
            .bind(subscription_id)
            .execute(&mut tx)
            .await?;

        tx.commit().await?;

        Ok((action, subscription))
    }

    #[tracing::instrument(name = "Cancel a subscription", skip(self))]
    async fn cancel(
        &self,
        subscription_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Subscription, StoreError> {
        let subscription = sqlx::query(&format!(
            r#"
            UPDATE subscriptions
            SET status = $3
            WHERE id = $1 AND customer_id = $2
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(subscription_id)
        .bind(customer_id)
        .bind(SubscriptionStatus::Cancelled.as_ref())
        .map(|row: PgRow| subscription_from_row(&row))
        .fetch_optional(&self.db_pool)
        .await?;

        subscription.ok_or(StoreError::NotFound)
    }
}
