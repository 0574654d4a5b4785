use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::profile_repository::ProfileRepository;
use crate::domain::users::portfolio::PortfolioItem;
use crate::domain::users::profile::{Profile, ProfileInput, Skill};
use crate::infrastructure::db::{PgPool, enum_col, opt_enum_col};

pub(crate) const PROFILE_COLUMNS: &str = "p.user_id, p.headline, p.hourly_rate, p.currency, \
    p.main_category, p.rate_type_preference, p.experience_level, p.freelancer_level, \
    p.delivery_time, p.average_rating, p.completed_jobs, p.goals";

pub struct SqlxProfileRepository {
    pub pool: PgPool,
}

impl SqlxProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn profile_from_row(r: &PgRow, skills: Vec<Skill>) -> anyhow::Result<Profile> {
    Ok(Profile {
        user_id: r.get("user_id"),
        headline: r.get("headline"),
        hourly_rate: r.get("hourly_rate"),
        currency: enum_col(r, "currency")?,
        main_category: opt_enum_col(r, "main_category")?,
        rate_type_preference: opt_enum_col(r, "rate_type_preference")?,
        experience_level: opt_enum_col(r, "experience_level")?,
        freelancer_level: enum_col(r, "freelancer_level")?,
        delivery_time: opt_enum_col(r, "delivery_time")?,
        average_rating: r.get("average_rating"),
        completed_jobs: r.get("completed_jobs"),
        goals: r.get("goals"),
        skills,
    })
}

/// Skills of every user in `user_ids`, each list in stored order.
pub(crate) async fn load_skills<'e, E>(
    executor: E,
    user_ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<Skill>>>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query(
        "SELECT user_id, name, level FROM profile_skills
         WHERE user_id = ANY($1) ORDER BY user_id, position",
    )
    .bind(user_ids)
    .fetch_all(executor)
    .await?;
    let mut out: HashMap<Uuid, Vec<Skill>> = HashMap::new();
    for r in rows {
        out.entry(r.get("user_id")).or_default().push(Skill {
            name: r.get("name"),
            level: enum_col(&r, "level")?,
        });
    }
    Ok(out)
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepository {
    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles p WHERE p.user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut skills = load_skills(&self.pool, &[user_id]).await?;
        Ok(Some(profile_from_row(
            &row,
            skills.remove(&user_id).unwrap_or_default(),
        )?))
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> anyhow::Result<Profile> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "INSERT INTO profiles AS p (user_id, headline, hourly_rate, currency, main_category,
                rate_type_preference, experience_level, freelancer_level, delivery_time, goals)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (user_id) DO UPDATE SET
                headline = EXCLUDED.headline,
                hourly_rate = EXCLUDED.hourly_rate,
                currency = EXCLUDED.currency,
                main_category = EXCLUDED.main_category,
                rate_type_preference = EXCLUDED.rate_type_preference,
                experience_level = EXCLUDED.experience_level,
                freelancer_level = EXCLUDED.freelancer_level,
                delivery_time = EXCLUDED.delivery_time,
                goals = EXCLUDED.goals,
                updated_at = now()
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(input.headline.as_deref())
        .bind(input.hourly_rate)
        .bind(input.currency.as_str())
        .bind(input.main_category.map(|c| c.as_str()))
        .bind(input.rate_type_preference.map(|r| r.as_str()))
        .bind(input.experience_level.map(|e| e.as_str()))
        .bind(input.freelancer_level.as_str())
        .bind(input.delivery_time.map(|d| d.as_str()))
        .bind(&input.goals)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM profile_skills WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        for (position, skill) in input.skills.iter().enumerate() {
            sqlx::query(
                "INSERT INTO profile_skills (user_id, position, name, level) VALUES ($1, $2, $3, $4)",
            )
            .bind(user_id)
            .bind(position as i32)
            .bind(&skill.name)
            .bind(skill.level.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        profile_from_row(&row, input.skills.clone())
    }

    async fn list_portfolio(&self, user_id: Uuid) -> anyhow::Result<Vec<PortfolioItem>> {
        let rows = sqlx::query(
            "SELECT id, user_id, title, link, created_at FROM portfolio_items
             WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(portfolio_from_row).collect())
    }

    async fn add_portfolio_item(
        &self,
        user_id: Uuid,
        title: &str,
        link: &str,
    ) -> anyhow::Result<PortfolioItem> {
        let row = sqlx::query(
            "INSERT INTO portfolio_items (user_id, title, link) VALUES ($1, $2, $3)
             RETURNING id, user_id, title, link, created_at",
        )
        .bind(user_id)
        .bind(title)
        .bind(link)
        .fetch_one(&self.pool)
        .await?;
        Ok(portfolio_from_row(&row))
    }
}

fn portfolio_from_row(r: &PgRow) -> PortfolioItem {
    PortfolioItem {
        id: r.get("id"),
        user_id: r.get("user_id"),
        title: r.get("title"),
        link: r.get("link"),
        created_at: r.get("created_at"),
    }
}
