use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription::{NewSubscription, SubscriptionRepo},
    domain::entities::subscription::{SubscriptionProfile, SubscriptionStatus},
};

fn row_to_profile(row: &sqlx::postgres::PgRow) -> SubscriptionProfile {
    SubscriptionProfile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        plan_id: row.get("plan_id"),
        status: row.get("status"),
        payment_intent_id: row.get("payment_intent_id"),
        current_period_end: row.get("current_period_end"),
        canceled_at: row.get("canceled_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, user_id, plan_id, status, payment_intent_id,
    current_period_end, canceled_at, created_at, updated_at
"#;

/// SQL mirror of `SubscriptionStatus::is_open`. The partial unique index in
/// the migration lists the same statuses.
const OPEN_STATUSES: &str =
    "('pending', 'active', 'trialing', 'past_due', 'canceled_at_period_end')";

/// SQL mirror of `SubscriptionStatus::is_reportable`.
const REPORTABLE_STATUSES: &str = "('active', 'trialing', 'past_due', 'canceled')";

#[async_trait]
impl SubscriptionRepo for PostgresPersistence {
    async fn create(&self, input: &NewSubscription) -> AppResult<SubscriptionProfile> {
        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO subscriptions (id, user_id, plan_id, status, payment_intent_id)
            VALUES ($1, $2, $3, 'pending', $4)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(input.user_id)
        .bind(&input.plan_id)
        .bind(&input.payment_intent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_profile(&row))
    }

    async fn find_blocking_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1 AND status IN {}",
            SELECT_COLS, OPEN_STATUSES
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn find_active_for_user(&self, user_id: Uuid) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1 AND status = 'active'",
            SELECT_COLS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn find_latest_reportable_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM subscriptions
            WHERE user_id = $1 AND status IN {}
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            SELECT_COLS, REPORTABLE_STATUSES
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE payment_intent_id = $1",
            SELECT_COLS
        ))
        .bind(payment_intent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_profile))
    }

    async fn mark_active(
        &self,
        id: Uuid,
        current_period_end: NaiveDateTime,
    ) -> AppResult<SubscriptionProfile> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscriptions SET
                status = 'active',
                current_period_end = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(current_period_end)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_profile(&row))
    }

    async fn mark_payment_failed(&self, id: Uuid) -> AppResult<SubscriptionProfile> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscriptions SET
                status = 'payment_failed',
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_profile(&row))
    }

    async fn mark_canceled(
        &self,
        id: Uuid,
        status: SubscriptionStatus,
        canceled_at: NaiveDateTime,
    ) -> AppResult<SubscriptionProfile> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscriptions SET
                status = $2,
                canceled_at = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(status)
        .bind(canceled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_profile(&row))
    }
}
