pub mod freelancer;
pub mod portfolio;
pub mod profile;
pub mod user;
