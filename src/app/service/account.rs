use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, SqlErr};

use crate::app::model::user;
use crate::app::service::password;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("email is already registered")]
    EmailTaken,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl NewAccount {
    /// Trims identifiers and rejects empty fields.
    fn normalized(self) -> Result<Self, AccountError> {
        let email = self.email.trim().to_string();
        let username = self.username.trim().to_string();

        if email.is_empty() || username.is_empty() || self.password.is_empty() {
            return Err(AccountError::Invalid("email, username and password are required"));
        }

        if !email.contains('@') {
            return Err(AccountError::Invalid("email address is invalid"));
        }

        Ok(NewAccount { email, username, password: self.password })
    }
}

/// Which identifier of `account` is already registered, email first.
async fn find_conflict(db: &DatabaseConnection, account: &NewAccount) -> Result<Option<AccountError>, DbErr> {
    if user::find_by_email(db, &account.email).await?.is_some() {
        return Ok(Some(AccountError::EmailTaken));
    }

    if user::find_by_username(db, &account.username).await?.is_some() {
        return Ok(Some(AccountError::UsernameTaken));
    }

    Ok(None)
}

/// Stores a new user with a hashed password.
#[tracing::instrument(level = "debug", skip(db, account), fields(email = %account.email))]
pub async fn register(db: &DatabaseConnection, account: NewAccount) -> Result<user::Model, AccountError> {
    let account = account.normalized()?;

    if let Some(conflict) = find_conflict(db, &account).await? {
        return Err(conflict);
    }

    let password_hash = password::hash_password(&account.password)?;

    let model = user::ActiveModel {
        email: Set(account.email.clone()),
        username: Set(account.username.clone()),
        password_hash: Set(password_hash),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    // A concurrent signup can still win the race past the lookups above.
    let created = match model.insert(db).await {
        Ok(created) => created,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(find_conflict(db, &account)
                .await?
                .unwrap_or(AccountError::Database(err)));
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(user_id = created.id, "account registered");

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::database;
    use crate::config::AppConfig;

    async fn migrated_db() -> DatabaseConnection {
        let db = database::connect(&AppConfig::with_database_url("sqlite::memory:"))
            .await
            .unwrap();
        database::create_all(&db).await.unwrap();
        db
    }

    fn account(email: &str, username: &str) -> NewAccount {
        NewAccount {
            email: email.into(),
            username: username.into(),
            password: "correct horse".into(),
        }
    }

    #[tokio::test]
    async fn stores_trimmed_identifiers_and_a_hash() {
        let db = migrated_db().await;

        let created = register(&db, account("  ada@example.com ", " ada ")).await.unwrap();

        assert_eq!(created.email, "ada@example.com");
        assert_eq!(created.username, "ada");
        assert_ne!(created.password_hash, "correct horse");
        assert!(password::verify_password("correct horse", &created.password_hash).unwrap());
    }

    #[tokio::test]
    async fn rejects_duplicates() {
        let db = migrated_db().await;
        register(&db, account("ada@example.com", "ada")).await.unwrap();

        let err = register(&db, account("ada@example.com", "other")).await.unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));

        let err = register(&db, account("other@example.com", "ada")).await.unwrap_err();
        assert!(matches!(err, AccountError::UsernameTaken));
    }

    #[tokio::test]
    async fn conflict_names_the_colliding_identifier() {
        let db = migrated_db().await;
        register(&db, account("ada@example.com", "ada")).await.unwrap();

        let username_only = account("new@example.com", "ada");
        assert!(matches!(
            find_conflict(&db, &username_only).await.unwrap(),
            Some(AccountError::UsernameTaken)
        ));

        let both = account("ada@example.com", "ada");
        assert!(matches!(find_conflict(&db, &both).await.unwrap(), Some(AccountError::EmailTaken)));

        let fresh = account("new@example.com", "newcomer");
        assert!(find_conflict(&db, &fresh).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_incomplete_accounts() {
        let db = migrated_db().await;

        let err = register(&db, account("", "ada")).await.unwrap_err();
        assert!(matches!(err, AccountError::Invalid(_)));

        let err = register(&db, account("not-an-email", "ada")).await.unwrap_err();
        assert!(matches!(err, AccountError::Invalid(_)));

        let mut no_password = account("ada@example.com", "ada");
        no_password.password.clear();
        assert!(matches!(register(&db, no_password).await.unwrap_err(), AccountError::Invalid(_)));
    }
}
