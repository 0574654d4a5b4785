use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::users::portfolio::PortfolioItem;
use crate::domain::users::profile::{Profile, ProfileInput};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;
    /// Replaces goals and skills wholesale; keeps rating and job count.
    async fn upsert_profile(&self, user_id: Uuid, input: &ProfileInput)
    -> anyhow::Result<Profile>;
    async fn list_portfolio(&self, user_id: Uuid) -> anyhow::Result<Vec<PortfolioItem>>;
    async fn add_portfolio_item(
        &self,
        user_id: Uuid,
        title: &str,
        link: &str,
    ) -> anyhow::Result<PortfolioItem>;
}
