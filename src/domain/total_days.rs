/// Longest subscription the service accepts. Keeps the derived end date far
/// away from the edge of chrono's calendar range.
const MAX_TOTAL_DAYS: u32 = 365;

/// Number of delivery days the customer is billed for, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TotalDays(u32);

impl TotalDays {
    pub fn parse(days: u32) -> Result<TotalDays, String> {
        if days == 0 {
            return Err(String::from(
                "a subscription must cover at least one delivery day",
            ));
        }

        if days > MAX_TOTAL_DAYS {
            return Err(format!(
                "{} days exceeds the maximum subscription length of {} days",
                days, MAX_TOTAL_DAYS
            ));
        }

        Ok(Self(days))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}
