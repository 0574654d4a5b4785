use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::domain::errors::DomainError;
use crate::domain::listings::listing::Listing;
use crate::domain::users::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User(Uuid),
    Anonymous,
}

impl Actor {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Actor::User(id) => Some(*id),
            Actor::Anonymous => None,
        }
    }
}

// Presentation layer is responsible for building Actor from HTTP inputs.

pub fn can_view_listing(actor: &Actor, listing: &Listing) -> bool {
    listing.is_published || actor.user_id() == Some(listing.owner_id)
}

/// Loads the acting user and fails unless they hold the admin role.
pub async fn require_admin<R>(users: &R, actor_id: Uuid) -> anyhow::Result<User>
where
    R: UserRepository + ?Sized,
{
    match users.find_by_id(actor_id).await? {
        Some(u) if u.is_admin() => Ok(u),
        _ => Err(DomainError::forbidden("admin role required").into()),
    }
}

pub async fn require_self_or_admin<R>(users: &R, actor_id: Uuid, target: Uuid) -> anyhow::Result<()>
where
    R: UserRepository + ?Sized,
{
    if actor_id == target {
        return Ok(());
    }
    require_admin(users, actor_id).await.map(|_| ())
}
