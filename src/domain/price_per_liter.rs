#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PricePerLiter(f64);

impl PricePerLiter {
    pub fn parse(price: f64) -> Result<PricePerLiter, String> {
        if !price.is_finite() || price <= 0.0 {
            return Err(format!("{} is not a valid price per liter", price));
        }

        Ok(Self(price))
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }
}
