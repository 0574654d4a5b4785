use crate::application::ports::freelancer_repository::FreelancerRepository;
use crate::domain::users::freelancer::{Freelancer, FreelancerFilters};

pub struct FilterFreelancers<'a, R: FreelancerRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: FreelancerRepository + ?Sized> FilterFreelancers<'a, R> {
    pub async fn execute(&self, filters: FreelancerFilters) -> anyhow::Result<Vec<Freelancer>> {
        let filters = filters.normalized()?;
        self.repo.filter(&filters).await
    }
}
