pub mod auth;
pub mod freelancers;
pub mod listings;
pub mod messages;
pub mod reviews;
pub mod uploads;
pub mod users;
pub mod verifications;
