use serde::Deserialize;

/// Real-estate offer kind.
///
/// Unknown values are kept verbatim so the formatter can fall back to the
/// raw string instead of failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OfferType {
    Sell,
    Rent,
    Chalet,
    Other(String),
}

impl OfferType {
    /// Case-normalizing constructor: `"sell"`, `"Sell"` and `"SELL"` are
    /// the same offer.
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "SELL" => Self::Sell,
            "RENT" => Self::Rent,
            "CHALET" => Self::Chalet,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Sell => "SELL",
            Self::Rent => "RENT",
            Self::Chalet => "CHALET",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for OfferType {
    fn default() -> Self {
        Self::Sell
    }
}

impl<'de> Deserialize<'de> for OfferType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(OfferType::parse(&raw))
    }
}

/// One incoming real-estate listing, parsed from the webhook payload.
///
/// Constructed once per inbound item and never mutated afterwards.
#[derive(Clone, Debug, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub area: f64,
    pub city_id: u32,
    pub city_name: String,
    pub district_name: String,
    pub subdistrict_name: String,
    pub category: String,
    pub subcategory: String,
    #[serde(default, deserialize_with = "deserialize_images")]
    pub images: Vec<String>,
    #[serde(default)]
    pub offer_type: OfferType,
    #[serde(default)]
    pub phone: Option<String>,
    pub url: String,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub floors: Option<u32>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub frontage_width: Option<f64>,
    #[serde(default)]
    pub frontage_depth: Option<f64>,
}

fn default_currency() -> String {
    "IQD".to_string()
}

/// Accepts `null`, missing, or a list with `null`/empty entries; keeps only
/// usable URLs, in their original order.
fn deserialize_images<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter(|url| !url.trim().is_empty())
        .collect())
}

/// One schema violation, reported back to the webhook caller.
#[derive(Clone, Debug)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Listing {
    /// Range checks mirroring the webhook schema. The posting pipeline
    /// assumes a listing that passed this.
    pub fn validate(&self) -> std::result::Result<(), FieldError> {
        if self.id.trim().is_empty() {
            return Err(FieldError::new("id", "must not be empty"));
        }
        let title_len = self.title.chars().count();
        if title_len == 0 || title_len > 500 {
            return Err(FieldError::new("title", "must be 1-500 characters"));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > 5000 {
                return Err(FieldError::new(
                    "description",
                    "must be at most 5000 characters",
                ));
            }
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(FieldError::new("price", "must be zero or positive"));
        }
        let currency_len = self.currency.chars().count();
        if !(2..=5).contains(&currency_len) {
            return Err(FieldError::new("currency", "must be a 2-5 character code"));
        }
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(FieldError::new("area", "must be positive"));
        }
        if self.city_id == 0 {
            return Err(FieldError::new("city_id", "must be positive"));
        }
        for (field, value) in [
            ("city_name", &self.city_name),
            ("district_name", &self.district_name),
            ("subdistrict_name", &self.subdistrict_name),
            ("category", &self.category),
            ("subcategory", &self.subcategory),
        ] {
            if value.trim().is_empty() {
                return Err(FieldError::new(field, "must not be empty"));
            }
        }
        if let Some(phone) = &self.phone {
            if phone.chars().count() > 20 {
                return Err(FieldError::new("phone", "must be at most 20 characters"));
            }
        }
        Ok(())
    }
}
