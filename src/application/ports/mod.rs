pub mod freelancer_repository;
pub mod listing_repository;
pub mod message_repository;
pub mod object_storage_port;
pub mod profile_repository;
pub mod realtime_port;
pub mod review_repository;
pub mod user_repository;
pub mod verification_repository;
