//! User entity <-> model mapper

use forum_core::entities::{Credentials, User};
use forum_core::value_objects::ActorId;

use crate::models::{CredentialsModel, UserModel};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: ActorId::new(model.id),
            username: model.username,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

impl From<CredentialsModel> for Credentials {
    fn from(model: CredentialsModel) -> Self {
        Credentials {
            actor_id: ActorId::new(model.id),
            password_hash: model.password_hash,
        }
    }
}
