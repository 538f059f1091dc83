use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::user::{NewUser, UserRepo},
    domain::entities::user::User,
};

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLS: &str = "id, email, password_hash, name, created_at, updated_at";

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create(&self, input: &NewUser) -> AppResult<User> {
        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, name)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_user(&row))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            SELECT_COLS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", SELECT_COLS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_user))
    }
}
