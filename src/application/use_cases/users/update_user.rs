use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::domain::errors::DomainError;
use crate::domain::users::user::{User, UserPatch};

pub const MAX_LANGUAGES: usize = 20;

pub struct UpdateUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateUser<'a, R> {
    pub async fn execute(&self, user_id: Uuid, patch: UserPatch) -> anyhow::Result<User> {
        let patch = normalize(patch)?;
        self.repo
            .update_user(user_id, &patch)
            .await?
            .ok_or_else(|| DomainError::NotFound("user").into())
    }
}

fn normalize(mut patch: UserPatch) -> Result<UserPatch, DomainError> {
    if let Some(name) = patch.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
    }
    if let Some(langs) = patch.languages.take() {
        let mut out: Vec<String> = Vec::with_capacity(langs.len());
        for l in langs {
            let l = l.trim().to_string();
            if !l.is_empty() && !out.iter().any(|x| x.eq_ignore_ascii_case(&l)) {
                out.push(l);
            }
        }
        if out.len() > MAX_LANGUAGES {
            return Err(DomainError::validation("too many languages"));
        }
        patch.languages = Some(out);
    }
    patch.bio = patch.bio.map(|b| b.trim().to_string());
    patch.location = patch.location.map(|l| l.trim().to_string());
    Ok(patch)
}
