use chrono::NaiveDate;

use crate::domain::milk_type::MilkType;
use crate::domain::subscription::Subscription;

/// Liters to deliver per milk type. Paused subscriptions contribute zero.
#[derive(Debug, Default, PartialEq, serde::Serialize)]
pub struct MilkTypeTotals {
    pub cow: f64,
    pub buffalo: f64,
    pub mixed: f64,
}

/// Read-side view of one delivery day across the active subscription set.
#[derive(Debug, serde::Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_deliveries: usize,
    pub total_paused: usize,
    pub delivering: Vec<Subscription>,
    pub paused: Vec<Subscription>,
    pub milk_type_totals: MilkTypeTotals,
}

impl DailySummary {
    /// Partitions the in-range subscriptions for `date` into delivering and
    /// paused, summing demand over the delivering side only. Pure aggregation;
    /// works for any historical or future date.
    pub fn aggregate(subscriptions: Vec<Subscription>, date: NaiveDate) -> DailySummary {
        let mut delivering = Vec::new();
        let mut paused = Vec::new();

        for subscription in subscriptions
            .into_iter()
            .filter(|subscription| subscription.is_date_in_range(date))
        {
            if subscription.is_paused_on(date) {
                paused.push(subscription);
            } else {
                delivering.push(subscription);
            }
        }

        let mut milk_type_totals = MilkTypeTotals::default();

        for subscription in &delivering {
            let quantity = subscription.quantity.as_f64();

            match subscription.milk_type {
                MilkType::Cow => milk_type_totals.cow += quantity,
                MilkType::Buffalo => milk_type_totals.buffalo += quantity,
                MilkType::Mixed => milk_type_totals.mixed += quantity,
            }
        }

        DailySummary {
            date,
            total_deliveries: delivering.len(),
            total_paused: paused.len(),
            delivering,
            paused,
            milk_type_totals,
        }
    }
}
