use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use time::Duration;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::jwt,
    domain::entities::user::{User, UserProfile},
    infra::password::{hash_password, verify_password},
};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, input: &NewUser) -> AppResult<User>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
}

#[derive(Clone)]
pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    jwt_secret: SecretString,
    token_ttl: Duration,
}

impl AuthUseCases {
    pub fn new(repo: Arc<dyn UserRepo>, jwt_secret: SecretString, token_ttl: Duration) -> Self {
        Self {
            repo,
            jwt_secret,
            token_ttl,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> AppResult<UserProfile> {
        let email = email.trim().to_lowercase();

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .repo
            .create(&NewUser {
                email: email.clone(),
                password_hash,
                name: name.map(|n| n.trim().to_string()),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Verifies the credential and issues a bearer token. Unknown email and
    /// wrong password are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let email = email.trim().to_lowercase();

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&user.password_hash, password)? {
            tracing::warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = jwt::issue(user.id, &self.jwt_secret, self.token_ttl)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let user = self.repo.get_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        Ok(user.into())
    }
}
