use uuid::Uuid;

use crate::application::access;
use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::errors::{DomainError, is_http_url};
use crate::domain::users::portfolio::PortfolioItem;

pub struct AddPortfolioItem<'a, U, P>
where
    U: UserRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub users: &'a U,
    pub profiles: &'a P,
}

impl<'a, U, P> AddPortfolioItem<'a, U, P>
where
    U: UserRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        title: &str,
        link: &str,
    ) -> anyhow::Result<PortfolioItem> {
        access::require_self_or_admin(self.users, actor_id, user_id).await?;
        let title = title.trim();
        let link = link.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title must not be empty").into());
        }
        if !is_http_url(link) {
            return Err(DomainError::validation("link must be an http(s) URL").into());
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::NotFound("user").into());
        }
        self.profiles.add_portfolio_item(user_id, title, link).await
    }
}
