pub mod auth;
pub mod blog;

use serde::{Deserialize, Serialize};

/// The authenticated identity a service operation acts on behalf of.
/// Everything outside `auth` sees accounts only through this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i32,
    pub username: String,
}

impl From<&crate::db::user::Model> for Actor {
    fn from(account: &crate::db::user::Model) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
        }
    }
}
