pub mod add_portfolio_item;
pub mod get_public_profile;
pub mod update_user;
pub mod upload_profile_image;
pub mod upsert_profile;
