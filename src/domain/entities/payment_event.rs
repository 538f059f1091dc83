use serde::Deserialize;

/// Payment-provider webhook payload: `{type, data: {object: {id, status}}}`.
///
/// Anything beyond this shape is provider detail we do not depend on.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEventData {
    pub object: PaymentIntentObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentObject {
    /// Payment intent id; matched against `SubscriptionProfile::payment_intent_id`.
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// The event types the reconciler acts on. Everything else is acknowledged
/// to the provider but produces no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEventKind {
    Succeeded,
    Failed,
    Unhandled,
}

impl PaymentEvent {
    pub fn kind(&self) -> PaymentEventKind {
        match self.event_type.as_str() {
            "payment_intent.succeeded" => PaymentEventKind::Succeeded,
            "payment_intent.payment_failed" => PaymentEventKind::Failed,
            _ => PaymentEventKind::Unhandled,
        }
    }
}
