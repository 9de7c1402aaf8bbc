#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MilkType {
    Cow,
    Buffalo,
    Mixed,
}

impl MilkType {
    pub fn parse(milk_type: String) -> Result<MilkType, String> {
        match milk_type.as_str() {
            "cow" => Ok(MilkType::Cow),
            "buffalo" => Ok(MilkType::Buffalo),
            "mixed" => Ok(MilkType::Mixed),
            _ => Err(format!("{} is not a valid milk type", milk_type)),
        }
    }
}

impl AsRef<str> for MilkType {
    fn as_ref(&self) -> &str {
        match self {
            MilkType::Cow => "cow",
            MilkType::Buffalo => "buffalo",
            MilkType::Mixed => "mixed",
        }
    }
}
