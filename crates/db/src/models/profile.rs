//! Profile models.

use bakery_core::error::CoreError;
use bakery_core::roles::Role;
use bakery_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }
}

/// Profile joined with the identity email, for the users admin table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileWithEmail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: Profile,
    pub email: String,
}

/// Fields a shopper may edit on their own profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// DTO for an admin role change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRole {
    pub role: Role,
}
