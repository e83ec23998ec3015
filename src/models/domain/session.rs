use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{domain::user::UserRole, dto::response::UserDto};

/// The identity the running client is authenticated as.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub user: UserDto,
    /// Signed token persisted in the token store for this session.
    pub token: String,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: UserDto, token: String) -> Self {
        Session {
            user,
            token,
            established_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }
}
