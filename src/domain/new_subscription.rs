use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::delivery_period::parse_delivery_date;
use crate::domain::milk_quantity::MilkQuantity;
use crate::domain::milk_type::MilkType;
use crate::domain::price_per_liter::PricePerLiter;
use crate::domain::total_days::TotalDays;

#[derive(Debug)]
pub struct NewSubscription {
    pub customer_id: Uuid,
    pub milk_type: MilkType,
    pub quantity: MilkQuantity,
    pub price_per_liter: PricePerLiter,
    pub total_days: TotalDays,
    pub start_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct NewSubscriptionBody {
    pub milk_type: String,
    pub quantity: f64,
    pub price_per_liter: f64,
    pub total_days: u32,
    pub start_date: Option<String>,
}

impl NewSubscription {
    /// Validates a request body into a creation command. The caller identity
    /// comes from the authentication layer and `today` is the default start
    /// when the body does not carry one.
    pub fn parse(
        body: NewSubscriptionBody,
        customer_id: Uuid,
        today: NaiveDate,
    ) -> Result<NewSubscription, String> {
        let milk_type = MilkType::parse(body.milk_type)?;
        let quantity = MilkQuantity::parse(body.quantity)?;
        let price_per_liter = PricePerLiter::parse(body.price_per_liter)?;
        let total_days = TotalDays::parse(body.total_days)?;
        let start_date = match body.start_date {
            Some(raw) => parse_delivery_date(&raw)?,
            None => today,
        };

        Ok(NewSubscription {
            customer_id,
            milk_type,
            quantity,
            price_per_liter,
            total_days,
            start_date,
        })
    }
}
