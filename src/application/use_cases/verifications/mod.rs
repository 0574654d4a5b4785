pub mod get_my_verification;
pub mod list_pending;
pub mod submit_verification;
pub mod update_status;
