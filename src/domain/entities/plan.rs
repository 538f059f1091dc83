use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Yearly,
}

impl BillingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Monthly => "monthly",
            BillingInterval::Yearly => "yearly",
        }
    }
}

/// The single subscription plan on offer.
///
/// Read-only reference data: built once at startup and handed to the
/// subscription use cases, never mutated or loaded from storage.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i32,
    pub currency: String,
    pub interval: BillingInterval,
    pub features: Vec<String>,
}

impl Plan {
    pub fn premium_monthly() -> Self {
        Self {
            id: "premium-monthly".to_string(),
            name: "Premium Plan".to_string(),
            description: "Full access to all features".to_string(),
            price_cents: 1999,
            currency: "EUR".to_string(),
            interval: BillingInterval::Monthly,
            features: vec![
                "Feature 1".to_string(),
                "Feature 2".to_string(),
                "Feature 3".to_string(),
                "Priority Support".to_string(),
            ],
        }
    }
}
