use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};

/// Authenticated caller. Built by the presentation layer from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User(Uuid),
    Admin(Uuid),
}

impl Actor {
    pub fn id(&self) -> Uuid {
        match self {
            Actor::User(id) | Actor::Admin(id) => *id,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin(_))
    }

    /// True when the actor may see a resource owned by `owner_id`.
    pub fn can_view_owned(&self, owner_id: Uuid) -> bool {
        match self {
            Actor::Admin(_) => true,
            Actor::User(id) => *id == owner_id,
        }
    }
}

pub fn require_user(actor: &Actor) -> ServiceResult<Uuid> {
    match actor {
        Actor::User(id) => Ok(*id),
        Actor::Admin(_) => Err(ServiceError::forbidden("user account required")),
    }
}

pub fn require_admin(actor: &Actor) -> ServiceResult<Uuid> {
    match actor {
        Actor::Admin(id) => Ok(*id),
        Actor::User(_) => Err(ServiceError::forbidden("admin access required")),
    }
}
