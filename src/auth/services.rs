use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::{auth::repo_types::User, error::ApiError};

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))
}

/// `Err` only when the stored hash cannot be parsed.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "unreadable stored password hash");
        anyhow::anyhow!("argon2 parse: {e}")
    })?;
    Ok(Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
}

/// Stores a new account. A taken username is a conflict whether the
/// pre-check or the UNIQUE constraint catches it.
pub async fn register_user(db: &SqlitePool, username: &str, password: &str) -> Result<User, ApiError> {
    if User::find_by_username(db, username).await?.is_some() {
        warn!(username, "username already registered");
        return Err(ApiError::Conflict("Username already taken".into()));
    }

    let hash = hash_password(password)?;

    match User::create(db, username, &hash).await {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!(username, "username taken concurrently");
            Err(ApiError::Conflict("Username already taken".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// `None` for an unknown username or a wrong password.
pub async fn authenticate(db: &SqlitePool, username: &str, password: &str) -> Result<Option<User>, ApiError> {
    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(username, "login unknown username");
        return Ok(None);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(username, user_id = user.id, "login invalid password");
        return Ok(None);
    }

    Ok(Some(user))
}

#[cfg(test)]
mod account_tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let db = db::memory().await;
        let user = register_user(&db, "alice", "secret1").await.expect("register");
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "secret1");

        let err = register_user(&db, "alice", "other-pass").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let db = db::memory().await;
        let user = register_user(&db, "bob", "hunter22").await.expect("register");

        let found = authenticate(&db, "bob", "hunter22").await.expect("query");
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert!(authenticate(&db, "bob", "hunter23").await.expect("query").is_none());
        assert!(authenticate(&db, "nobody", "hunter22").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn stored_password_is_a_salted_argon2_hash() {
        let db = db::memory().await;
        let alice = register_user(&db, "alice", "secret1").await.expect("register");
        let bob = register_user(&db, "bob", "secret1").await.expect("register");

        assert!(alice.password_hash.starts_with("$argon2"));
        assert_ne!(alice.password_hash, bob.password_hash);
        assert!(verify_password("secret1", &alice.password_hash).expect("verify"));
        assert!(!verify_password("secret2", &alice.password_hash).expect("verify"));
    }

    #[tokio::test]
    async fn unreadable_stored_hash_is_an_internal_error() {
        let db = db::memory().await;
        register_user(&db, "carol", "secret1").await.expect("register");
        sqlx::query(r#"UPDATE "user" SET password = 'secret1' WHERE username = 'carol'"#)
            .execute(&db)
            .await
            .expect("update");

        let err = authenticate(&db, "carol", "secret1").await.unwrap_err();
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}
