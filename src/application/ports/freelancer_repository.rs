use async_trait::async_trait;

use crate::domain::users::freelancer::{Freelancer, FreelancerFilters};

#[async_trait]
pub trait FreelancerRepository: Send + Sync {
    /// `filters` are expected to be normalized already.
    async fn filter(&self, filters: &FreelancerFilters) -> anyhow::Result<Vec<Freelancer>>;
}
