pub mod daily_summary;
pub mod health_check;
pub mod subscriptions;

pub use daily_summary::handle_daily_summary;
pub use health_check::health_check;
pub use subscriptions::{
    handle_active_subscription, handle_all_subscriptions, handle_cancel_subscription,
    handle_create_subscription, handle_my_subscriptions, handle_toggle_pause,
};
