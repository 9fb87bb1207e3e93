use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::db::user;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new account. The password is stored as a bcrypt hash.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<user::Model> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::validation("username and password are required"));
        }

        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(Error::validation("username is already taken"));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        let account = user::ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.trim().to_owned()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        log::info!("registered user {} ({})", account.username, account.id);
        Ok(account)
    }

    /// Verifies credentials. `None` means unknown username or wrong
    /// password; callers cannot tell which.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<user::Model>> {
        let Some(account) = user::Entity::find()
            .filter(user::Column::Username.eq(username.trim()))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        if bcrypt::verify(password, &account.password_hash)? {
            log::info!("user {} signed in", account.username);
            Ok(Some(account))
        } else {
            log::warn!("failed sign-in attempt for user {}", account.username);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::error::Error;

    async fn setup() -> AuthService {
        let conn = db::connect("sqlite::memory:").await.unwrap();
        db::init_schema(&conn).await.unwrap();
        AuthService::new(conn)
    }

    #[tokio::test]
    async fn signup_then_authenticate() {
        let auth = setup().await;
        let account = auth
            .signup("alice", "alice@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(account.username, "alice");
        assert_ne!(account.password_hash, "correct horse");

        let found = auth.authenticate("alice", "correct horse").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(account.id));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_both_yield_none() {
        let auth = setup().await;
        auth.signup("alice", "alice@example.com", "correct horse")
            .await
            .unwrap();

        assert!(auth.authenticate("alice", "wrong").await.unwrap().is_none());
        assert!(
            auth.authenticate("nobody", "correct horse")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let auth = setup().await;
        auth.signup("alice", "alice@example.com", "pw1-abcdef")
            .await
            .unwrap();
        let err = auth
            .signup("alice", "other@example.com", "pw2-abcdef")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
