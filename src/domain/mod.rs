pub mod daily_summary;
pub mod delivery_period;
pub mod milk_quantity;
pub mod milk_type;
pub mod new_subscription;
pub mod price_per_liter;
pub mod subscription;
pub mod subscription_status;
pub mod total_days;
