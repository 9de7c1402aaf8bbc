/// Daily delivery volume in liters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MilkQuantity(f64);

impl MilkQuantity {
    pub fn parse(liters: f64) -> Result<MilkQuantity, String> {
        if !liters.is_finite() || liters <= 0.0 {
            return Err(format!("{} is not a valid daily quantity of liters", liters));
        }

        Ok(Self(liters))
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }
}
