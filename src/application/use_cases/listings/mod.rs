pub mod browse_listings;
pub mod create_listing;
pub mod delete_listing;
pub mod get_listing;
pub mod list_user_listings;
pub mod update_listing;
