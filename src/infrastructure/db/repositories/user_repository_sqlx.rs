use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::enums::Role;
use crate::domain::users::user::{User, UserPatch};
use crate::infrastructure::db::{PgPool, enum_col, map_unique_violation};

const USER_COLUMNS: &str = "id, name, email, image, bio, location, languages, is_verified, \
                            is_open_to_work, email_verified, role, created_at";

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn user_from_row(r: &PgRow) -> anyhow::Result<User> {
    Ok(User {
        id: r.get("id"),
        name: r.get("name"),
        email: r.get("email"),
        image: r.get("image"),
        bio: r.get("bio"),
        location: r.get("location"),
        languages: r.get("languages"),
        is_verified: r.get("is_verified"),
        is_open_to_work: r.get("is_open_to_work"),
        email_verified: r.get("email_verified"),
        role: enum_col(r, "role")?,
        created_at: r.get("created_at"),
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
        email_verified: bool,
    ) -> anyhow::Result<User> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (email, name, password_hash, role, email_verified)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(email_verified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email already registered"))?;
        user_from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, email, name, password_hash, email_verified, role
               FROM users WHERE LOWER(email) = LOWER($1)"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| {
            Ok::<_, anyhow::Error>(UserRow {
                id: r.get("id"),
                email: r.get("email"),
                name: r.get("name"),
                password_hash: r.try_get("password_hash").ok().flatten(),
                email_verified: r.get("email_verified"),
                role: enum_col(&r, "role")?,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                location = COALESCE($4, location),
                languages = COALESCE($5, languages),
                is_open_to_work = COALESCE($6, is_open_to_work)
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.bio.as_deref())
        .bind(patch.location.as_deref())
        .bind(patch.languages.as_ref())
        .bind(patch.is_open_to_work)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn set_image(&self, id: Uuid, image_url: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE users SET image = $2 WHERE id = $1")
            .bind(id)
            .bind(image_url)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn store_email_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO email_verification_tokens (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn consume_email_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Uuid>> {
        let mut tx = self.pool.begin().await?;
        // Single use: the row goes away whether or not it is still valid.
        let row = sqlx::query(
            "DELETE FROM email_verification_tokens WHERE token_hash = $1 RETURNING user_id, expires_at",
        )
        .bind(token_hash)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            tx.commit().await?;
            return Ok(None);
        };
        let user_id: Uuid = row.get("user_id");
        let expires_at: DateTime<Utc> = row.get("expires_at");
        if expires_at < now {
            tx.commit().await?;
            return Ok(None);
        }
        sqlx::query("UPDATE users SET email_verified = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(user_id))
    }
}
