use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Lifecycle status of a subscription record.
///
/// `pending` records are waiting on the payment provider; webhook
/// reconciliation moves them to `active` or `payment_failed`. Cancellation
/// moves `active` records to `canceled` (immediate) or
/// `canceled_at_period_end` (scheduled). `trialing` and `past_due` are
/// provider-driven states symmetric to `active`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    AsRefStr,
    Display,
    EnumString,
)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SubscriptionStatus {
    Pending,
    Active,
    PastDue,
    Canceled,
    CanceledAtPeriodEnd,
    PaymentFailed,
    Trialing,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::CanceledAtPeriodEnd => "canceled_at_period_end",
            SubscriptionStatus::PaymentFailed => "payment_failed",
            SubscriptionStatus::Trialing => "trialing",
        }
    }

    /// Returns true while the record still occupies the user's single
    /// subscription slot. A user may hold at most one open record; a new
    /// subscription cannot be initiated while one of these exists.
    /// `canceled_at_period_end` counts as open until its effective date.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Pending
                | SubscriptionStatus::Active
                | SubscriptionStatus::Trialing
                | SubscriptionStatus::PastDue
                | SubscriptionStatus::CanceledAtPeriodEnd
        )
    }

    /// Returns true if user should have access to subscription features.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        )
    }

    /// Statuses surfaced by the status query. `pending` and
    /// `payment_failed` records are invisible there; clients poll until the
    /// webhook resolves them.
    pub fn is_reportable(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active
                | SubscriptionStatus::Trialing
                | SubscriptionStatus::PastDue
                | SubscriptionStatus::Canceled
        )
    }

    /// Terminal for the current record; a new record may later be initiated.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Canceled | SubscriptionStatus::PaymentFailed
        )
    }
}

/// A durable subscription record.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    /// Correlation key minted at initiation; the join key for webhook
    /// reconciliation. Unique across all records.
    pub payment_intent_id: String,
    pub current_period_end: Option<NaiveDateTime>,
    /// Effective cancellation date, set when the record is canceled
    /// (immediately or scheduled for period end).
    pub canceled_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
