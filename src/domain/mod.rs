pub mod enums;
pub mod errors;
pub mod listings;
pub mod messages;
pub mod reviews;
pub mod users;
pub mod verifications;
