use uuid::Uuid;

use crate::application::ports::profile_repository::ProfileRepository;
use crate::domain::errors::DomainError;
use crate::domain::users::profile::{Profile, ProfileInput};

pub const MAX_SKILLS: usize = 50;
pub const MAX_GOALS: usize = 20;
pub const MAX_HEADLINE_LEN: usize = 160;

pub struct UpsertProfile<'a, P: ProfileRepository + ?Sized> {
    pub profiles: &'a P,
}

impl<'a, P: ProfileRepository + ?Sized> UpsertProfile<'a, P> {
    pub async fn execute(&self, user_id: Uuid, input: ProfileInput) -> anyhow::Result<Profile> {
        let input = validate(input)?;
        self.profiles.upsert_profile(user_id, &input).await
    }
}

fn validate(mut input: ProfileInput) -> Result<ProfileInput, DomainError> {
    input.headline = input
        .headline
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty());
    if let Some(h) = &input.headline {
        if h.chars().count() > MAX_HEADLINE_LEN {
            return Err(DomainError::validation("headline is too long"));
        }
    }
    if let Some(rate) = input.hourly_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(DomainError::validation("hourlyRate must be a non-negative number"));
        }
    }
    input.goals = input
        .goals
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();
    if input.goals.len() > MAX_GOALS {
        return Err(DomainError::validation("too many goals"));
    }
    if input.skills.len() > MAX_SKILLS {
        return Err(DomainError::validation("too many skills"));
    }
    for s in input.skills.iter_mut() {
        s.name = s.name.trim().to_string();
        if s.name.is_empty() {
            return Err(DomainError::validation("skill name must not be empty"));
        }
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, profile_input};
    use crate::domain::enums::{Role, SkillLevel};
    use crate::domain::users::profile::Skill;

    #[tokio::test]
    async fn keeps_order_and_preserves_rating() {
        let store = InMemoryStore::default();
        let u = store.seed_user("Dawit", "dawit@example.com", Role::User).await;
        let uc = UpsertProfile { profiles: &store };

        let mut input = profile_input();
        input.goals = vec!["Ship".into(), " ".into(), "Learn".into()];
        input.skills = vec![
            Skill {
                name: "Rust".into(),
                level: SkillLevel::Expert,
            },
            Skill {
                name: " SQL ".into(),
                level: SkillLevel::Advanced,
            },
        ];
        uc.execute(u.id, input.clone()).await.unwrap();
        store.set_average_rating(u.id, Some(4.5)).await.unwrap();

        let again = uc.execute(u.id, input).await.unwrap();
        assert_eq!(again.goals, vec!["Ship", "Learn"]);
        let names: Vec<_> = again.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "SQL"]);
        assert_eq!(again.average_rating, Some(4.5));
    }

    #[tokio::test]
    async fn negative_rate_rejected() {
        let store = InMemoryStore::default();
        let uc = UpsertProfile { profiles: &store };
        let mut input = profile_input();
        input.hourly_rate = Some(-3.0);
        assert!(uc.execute(Uuid::new_v4(), input).await.is_err());
    }
}
