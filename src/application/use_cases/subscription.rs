use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        payment_event::{PaymentEvent, PaymentEventKind},
        plan::Plan,
        subscription::{SubscriptionProfile, SubscriptionStatus},
    },
};

/// Billing period granted by a successful payment.
pub const BILLING_PERIOD_DAYS: i64 = 30;

// ============================================================================
// Input / Result Types
// ============================================================================

/// Input for creating a subscription record. Records always start in
/// `pending`; only webhook reconciliation moves them forward.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub plan_id: String,
    pub payment_intent_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitiateResult {
    pub subscription_id: Uuid,
    pub payment_intent_id: String,
    pub payment_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatusView {
    pub status: SubscriptionStatus,
    pub current_period_end: Option<NaiveDateTime>,
    pub plan_id: String,
    pub plan_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancellationResult {
    pub status: SubscriptionStatus,
    pub message: String,
    pub effective_date: NaiveDateTime,
}

// ============================================================================
// Repository Trait
// ============================================================================

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn create(&self, input: &NewSubscription) -> AppResult<SubscriptionProfile>;

    /// Any record in an open status (`SubscriptionStatus::is_open`) for the
    /// user. One such record blocks re-initiation.
    async fn find_blocking_for_user(&self, user_id: Uuid)
    -> AppResult<Option<SubscriptionProfile>>;

    async fn find_active_for_user(&self, user_id: Uuid) -> AppResult<Option<SubscriptionProfile>>;

    /// Newest record among the reportable statuses
    /// (`SubscriptionStatus::is_reportable`), by creation time descending.
    async fn find_latest_reportable_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>>;

    async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>>;

    async fn mark_active(
        &self,
        id: Uuid,
        current_period_end: NaiveDateTime,
    ) -> AppResult<SubscriptionProfile>;

    async fn mark_payment_failed(&self, id: Uuid) -> AppResult<SubscriptionProfile>;

    async fn mark_canceled(
        &self,
        id: Uuid,
        status: SubscriptionStatus,
        canceled_at: NaiveDateTime,
    ) -> AppResult<SubscriptionProfile>;
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct SubscriptionUseCases {
    repo: Arc<dyn SubscriptionRepo>,
    plan: Plan,
    checkout_base_url: String,
}

impl SubscriptionUseCases {
    pub fn new(repo: Arc<dyn SubscriptionRepo>, plan: Plan, checkout_base_url: String) -> Self {
        Self {
            repo,
            plan,
            checkout_base_url: checkout_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The single static plan descriptor.
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Creates a `pending` record and returns the hosted-checkout handle.
    ///
    /// The pre-check-then-insert here races under concurrency; the partial
    /// unique index on open records per user is the backstop. Idempotent
    /// retries are handled by the idempotency guard at the HTTP boundary.
    #[instrument(skip(self))]
    pub async fn initiate(&self, user_id: Uuid, plan_id: &str) -> AppResult<InitiateResult> {
        if plan_id != self.plan.id {
            return Err(AppError::InvalidInput(format!("Unknown plan: {plan_id}")));
        }

        if let Some(existing) = self.repo.find_blocking_for_user(user_id).await? {
            tracing::info!(
                user_id = %user_id,
                existing_id = %existing.id,
                existing_status = %existing.status,
                "Rejecting initiation, user already has an open subscription"
            );
            return Err(AppError::AlreadySubscribed);
        }

        let payment_intent_id = mint_payment_intent_id();
        let payment_url = format!("{}/{}", self.checkout_base_url, payment_intent_id);

        let subscription = self
            .repo
            .create(&NewSubscription {
                user_id,
                plan_id: plan_id.to_string(),
                payment_intent_id: payment_intent_id.clone(),
            })
            .await?;

        tracing::info!(
            user_id = %user_id,
            subscription_id = %subscription.id,
            plan_id,
            "Subscription initiated"
        );

        Ok(InitiateResult {
            subscription_id: subscription.id,
            payment_intent_id,
            payment_url,
        })
    }

    /// Folds a provider-pushed payment event into the durable record it
    /// correlates with. Duplicated and out-of-order deliveries are expected:
    /// an event whose target status already holds is a no-op, and an event
    /// with no matching record is logged and dropped without error so the
    /// provider does not retry it.
    #[instrument(skip(self, event), fields(event_type = %event.event_type))]
    pub async fn reconcile_payment_event(&self, event: &PaymentEvent) -> AppResult<()> {
        let intent_id = &event.data.object.id;

        let kind = event.kind();
        if kind == PaymentEventKind::Unhandled {
            tracing::debug!(payment_intent_id = %intent_id, "Ignoring unhandled payment event type");
            return Ok(());
        }

        let Some(subscription) = self.repo.find_by_payment_intent(intent_id).await? else {
            tracing::warn!(
                payment_intent_id = %intent_id,
                "No subscription found for payment event"
            );
            return Ok(());
        };

        if kind == PaymentEventKind::Succeeded {
            if subscription.status == SubscriptionStatus::Active {
                tracing::debug!(
                    subscription_id = %subscription.id,
                    "Replayed success event for active subscription, nothing to do"
                );
                return Ok(());
            }
            let period_end = Utc::now().naive_utc() + chrono::Duration::days(BILLING_PERIOD_DAYS);
            self.repo.mark_active(subscription.id, period_end).await?;
            tracing::info!(
                subscription_id = %subscription.id,
                user_id = %subscription.user_id,
                "Subscription activated"
            );
        } else {
            if subscription.status == SubscriptionStatus::PaymentFailed {
                tracing::debug!(
                    subscription_id = %subscription.id,
                    "Replayed failure event, nothing to do"
                );
                return Ok(());
            }
            self.repo.mark_payment_failed(subscription.id).await?;
            tracing::info!(
                subscription_id = %subscription.id,
                user_id = %subscription.user_id,
                "Subscription payment failed"
            );
        }

        Ok(())
    }

    /// The newest reportable record for the user, joined with the plan's
    /// display name. A record still in `pending` is not reportable; clients
    /// poll until the webhook resolves it.
    #[instrument(skip(self))]
    pub async fn status(&self, user_id: Uuid) -> AppResult<SubscriptionStatusView> {
        let subscription = self
            .repo
            .find_latest_reportable_for_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(SubscriptionStatusView {
            status: subscription.status,
            current_period_end: subscription.current_period_end,
            plan_id: subscription.plan_id,
            plan_name: self.plan.name.clone(),
        })
    }

    /// Cancels the user's active subscription. A strictly-future effective
    /// date schedules the cancellation (`canceled_at_period_end`, period end
    /// untouched); anything else cancels immediately.
    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        user_id: Uuid,
        effective_date: Option<DateTime<Utc>>,
    ) -> AppResult<CancellationResult> {
        let subscription = self
            .repo
            .find_active_for_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        let (status, canceled_at, message) = match effective_date {
            Some(date) if date > now => (
                SubscriptionStatus::CanceledAtPeriodEnd,
                date.naive_utc(),
                "Subscription will be canceled at the end of the billing period",
            ),
            _ => (
                SubscriptionStatus::Canceled,
                now.naive_utc(),
                "Subscription has been canceled immediately",
            ),
        };

        self.repo
            .mark_canceled(subscription.id, status, canceled_at)
            .await?;

        tracing::info!(
            subscription_id = %subscription.id,
            user_id = %user_id,
            status = %status,
            "Subscription canceled"
        );

        Ok(CancellationResult {
            status,
            message: message.to_string(),
            effective_date: canceled_at,
        })
    }
}

fn mint_payment_intent_id() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!(
        "pi_{}",
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    )
}
