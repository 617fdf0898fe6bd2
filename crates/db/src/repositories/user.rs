use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use wellora_core::domain::user::{UserAccount, UserId};

use super::{format_timestamp, parse_timestamp, RepositoryError, UserRepository};
use crate::DbPool;

pub struct SqlUserRepository {
    pool: DbPool,
}

impl SqlUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, email, created_at FROM users WHERE id = ?")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        let row =
            sqlx::query("SELECT id, username, email, created_at FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    async fn save(&self, account: UserAccount) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                email = excluded.email
            "#,
        )
        .bind(&account.id.0)
        .bind(&account.username)
        .bind(&account.email)
        .bind(format_timestamp(&account.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn user_from_row(row: &SqliteRow) -> Result<UserAccount, RepositoryError> {
    let created_at: String = row.try_get("created_at")?;

    Ok(UserAccount {
        id: UserId(row.try_get("id")?),
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        created_at: parse_timestamp("created_at", created_at)?,
    })
}
