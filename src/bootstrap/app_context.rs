use std::sync::Arc;

use crate::application::ports::freelancer_repository::FreelancerRepository;
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::message_repository::MessageRepository;
use crate::application::ports::object_storage_port::ObjectStoragePort;
use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::ports::realtime_port::RealtimePort;
use crate::application::ports::review_repository::ReviewRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::ports::verification_repository::VerificationRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::realtime::RealtimeHub;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    pub pool: PgPool,
    services: Arc<AppServices>,
}

pub struct AppServices {
    pub user_repo: Arc<dyn UserRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub freelancer_repo: Arc<dyn FreelancerRepository>,
    pub listing_repo: Arc<dyn ListingRepository>,
    pub verification_repo: Arc<dyn VerificationRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub message_repo: Arc<dyn MessageRepository>,
    pub object_storage: Arc<dyn ObjectStoragePort>,
    pub hub: RealtimeHub,
}

impl AppContext {
    pub fn new(cfg: Config, pool: PgPool, services: AppServices) -> Self {
        Self {
            cfg,
            pool,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn profile_repo(&self) -> Arc<dyn ProfileRepository> {
        self.services.profile_repo.clone()
    }

    pub fn freelancer_repo(&self) -> Arc<dyn FreelancerRepository> {
        self.services.freelancer_repo.clone()
    }

    pub fn listing_repo(&self) -> Arc<dyn ListingRepository> {
        self.services.listing_repo.clone()
    }

    pub fn verification_repo(&self) -> Arc<dyn VerificationRepository> {
        self.services.verification_repo.clone()
    }

    pub fn review_repo(&self) -> Arc<dyn ReviewRepository> {
        self.services.review_repo.clone()
    }

    pub fn message_repo(&self) -> Arc<dyn MessageRepository> {
        self.services.message_repo.clone()
    }

    pub fn object_storage(&self) -> Arc<dyn ObjectStoragePort> {
        self.services.object_storage.clone()
    }

    pub fn realtime_port(&self) -> Arc<dyn RealtimePort> {
        Arc::new(self.services.hub.clone())
    }

    pub fn hub(&self) -> &RealtimeHub {
        &self.services.hub
    }
}
