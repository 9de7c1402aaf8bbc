use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeStruct;
use uuid::Uuid;

use crate::domain::delivery_period::{compute_end_date, PauseAction};
use crate::domain::milk_quantity::MilkQuantity;
use crate::domain::milk_type::MilkType;
use crate::domain::price_per_liter::PricePerLiter;
use crate::domain::subscription_status::SubscriptionStatus;
use crate::domain::total_days::TotalDays;

#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub milk_type: MilkType,
    pub quantity: MilkQuantity,
    pub price_per_liter: PricePerLiter,
    pub total_days: TotalDays,
    pub start_date: NaiveDate,
    pub paused_dates: BTreeSet<NaiveDate>,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Last delivery date, recomputed from the current pause set on every call.
    pub fn end_date(&self) -> NaiveDate {
        compute_end_date(
            self.start_date,
            self.total_days.as_u32(),
            self.paused_dates.len(),
        )
    }

    /// Whether `date` falls inside the active period, boundaries included.
    pub fn is_date_in_range(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date()
    }

    pub fn is_paused_on(&self, date: NaiveDate) -> bool {
        self.paused_dates.contains(&date)
    }

    /// Flips membership of `date` in the pause set.
    ///
    /// Range and status validation happen in the caller against the pre-toggle
    /// end date; after the toggle the end date has already moved.
    pub fn toggle_pause(&mut self, date: NaiveDate) -> PauseAction {
        if self.paused_dates.remove(&date) {
            PauseAction::Unpaused
        } else {
            self.paused_dates.insert(date);
            PauseAction::Paused
        }
    }
}

// Hand-written so the derived end date is part of every serialized view
// without ever being stored.
impl serde::Serialize for Subscription {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Subscription", 11)?;

        state.serialize_field("id", &self.id)?;
        state.serialize_field("customer_id", &self.customer_id)?;
        state.serialize_field("milk_type", &self.milk_type)?;
        state.serialize_field("quantity", &self.quantity)?;
        state.serialize_field("price_per_liter", &self.price_per_liter)?;
        state.serialize_field("total_days", &self.total_days)?;
        state.serialize_field("start_date", &self.start_date)?;
        state.serialize_field("end_date", &self.end_date())?;
        state.serialize_field("paused_dates", &self.paused_dates)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("created_at", &self.created_at)?;

        state.end()
    }
}
