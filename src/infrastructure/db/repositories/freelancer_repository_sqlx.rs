use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::application::ports::freelancer_repository::FreelancerRepository;
use crate::domain::users::freelancer::{Freelancer, FreelancerFilters};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::contains_pattern;
use crate::infrastructure::db::repositories::profile_repository_sqlx::{
    PROFILE_COLUMNS, load_skills, profile_from_row,
};

pub struct SqlxFreelancerRepository {
    pub pool: PgPool,
}

impl SqlxFreelancerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds the discovery query. Each supplied filter adds one AND-ed predicate.
pub(crate) fn build_filter_query(f: &FreelancerFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT u.id, u.name, u.image, u.bio, u.location, u.languages, u.is_verified, \
         u.is_open_to_work, u.created_at, {PROFILE_COLUMNS} \
         FROM profiles p JOIN users u ON u.id = p.user_id WHERE TRUE"
    ));

    if let Some(search) = f.search.as_deref() {
        let pattern = contains_pattern(search);
        qb.push(" AND (u.name ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR p.headline ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR u.bio ILIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
    if let Some(c) = f.category {
        qb.push(" AND p.main_category = ").push_bind(c.as_str());
    }
    if let Some(r) = f.rate_type {
        qb.push(" AND p.rate_type_preference = ").push_bind(r.as_str());
    }
    if let Some(e) = f.experience_level {
        qb.push(" AND p.experience_level = ").push_bind(e.as_str());
    }
    if let Some(lang) = f.language.as_deref() {
        qb.push(" AND EXISTS (SELECT 1 FROM unnest(u.languages) AS l(name) WHERE LOWER(l.name) = LOWER(")
            .push_bind(lang.to_string())
            .push("))");
    }
    if let Some(min) = f.min_rating {
        // NULL >= x is never true, so unrated profiles drop out.
        qb.push(" AND p.average_rating >= ").push_bind(min);
    }
    if let Some(level) = f.freelancer_level {
        qb.push(" AND p.freelancer_level = ").push_bind(level.as_str());
    }
    if let Some(d) = f.delivery_time {
        qb.push(" AND p.delivery_time = ").push_bind(d.as_str());
    }
    if let Some(loc) = f.location.as_deref() {
        qb.push(" AND u.location ILIKE ")
            .push_bind(contains_pattern(loc))
            .push(r" ESCAPE '\'");
    }
    if f.verified_only == Some(true) {
        qb.push(" AND u.is_verified");
    }
    if f.open_to_work == Some(true) {
        qb.push(" AND u.is_open_to_work");
    }

    qb.push(
        " ORDER BY p.average_rating DESC NULLS LAST, p.completed_jobs DESC, \
         u.created_at DESC, u.id ASC LIMIT ",
    )
    .push_bind(f.page_limit())
    .push(" OFFSET ")
    .push_bind(f.page_offset());
    qb
}

#[async_trait]
impl FreelancerRepository for SqlxFreelancerRepository {
    async fn filter(&self, filters: &FreelancerFilters) -> anyhow::Result<Vec<Freelancer>> {
        let mut qb = build_filter_query(filters);
        let rows = qb.build().fetch_all(&self.pool).await?;
        let ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();
        let mut skills = load_skills(&self.pool, &ids).await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in &rows {
            let id: Uuid = r.get("id");
            let profile = profile_from_row(r, skills.remove(&id).unwrap_or_default())?;
            out.push(Freelancer {
                id,
                name: r.get("name"),
                image: r.get("image"),
                bio: r.get("bio"),
                location: r.get("location"),
                languages: r.get("languages"),
                is_verified: r.get("is_verified"),
                is_open_to_work: r.get("is_open_to_work"),
                created_at: r.get("created_at"),
                profile,
            });
        }
        tracing::debug!(count = out.len(), "freelancer_filter");
        Ok(out)
    }
}
