//! OAuth token persistence

use crate::auth::{StoredToken, TokenStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use djset_common::{Error, Result};
use sqlx::{Row, SqlitePool};

/// [`TokenStore`] over the `oauth_tokens` table
#[derive(Clone)]
pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn load(&self, user_id: &str) -> Result<Option<StoredToken>> {
        let row = sqlx::query(
            "SELECT access_token, refresh_token, expires_at FROM oauth_tokens WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: String = row.get("expires_at");
        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|e| Error::Internal(format!("Stored token expiry unreadable: {}", e)))?
            .with_timezone(&Utc);

        Ok(Some(StoredToken {
            user_id: user_id.to_string(),
            access_token: row.get("access_token"),
            refresh_token: row.get("refresh_token"),
            expires_at,
        }))
    }

    async fn save(&self, token: &StoredToken) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO oauth_tokens (user_id, access_token, refresh_token, expires_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&token.user_id)
        .bind(&token.access_token)
        .bind(&token.refresh_token)
        .bind(token.expires_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id = %token.user_id, "Saved OAuth token");
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM oauth_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
