pub mod freelancer_repository_sqlx;
pub mod listing_repository_sqlx;
pub mod message_repository_sqlx;
pub mod profile_repository_sqlx;
pub mod review_repository_sqlx;
pub mod user_repository_sqlx;
pub mod verification_repository_sqlx;
