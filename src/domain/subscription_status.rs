#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Completed,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }

    pub fn parse(status: String) -> Result<SubscriptionStatus, String> {
        match status.as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "completed" => Ok(SubscriptionStatus::Completed),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            _ => Err(format!("{} is not a valid subscription status", status)),
        }
    }
}

impl AsRef<str> for SubscriptionStatus {
    fn as_ref(&self) -> &str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Completed => "completed",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}
