//! Repository for the `profiles` table.

use bakery_core::roles::Role;
use bakery_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{Profile, ProfileWithEmail, UpdateProfile};

const COLUMNS: &str = "id, full_name, phone, city, role, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The stored role string for a user, if a profile exists.
    pub async fn find_role(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(role,)| role))
    }

    /// Apply a shopper's own profile edit. Only non-`None` fields change.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                city = COALESCE($4, city)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.city)
            .fetch_optional(pool)
            .await
    }

    /// Every profile with its login email, newest first.
    pub async fn list_with_email(pool: &PgPool) -> Result<Vec<ProfileWithEmail>, sqlx::Error> {
        sqlx::query_as::<_, ProfileWithEmail>(
            "SELECT p.id, p.full_name, p.phone, p.city, p.role, p.created_at, p.updated_at, u.email
             FROM profiles p
             JOIN users u ON u.id = p.id
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Change a user's role. Returns `None` if no profile has the given `id`.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: Role,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("UPDATE profiles SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(pool)
            .await
    }
}
