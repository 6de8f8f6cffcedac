use chrono::{DateTime, Utc};
use pms_shared::GuestResponse;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgExecutor};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Guest {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    /// Create the guest or refresh the stored details of an existing one.
    /// Guests are identified by their (normalized) email address.
    pub async fn upsert(
        conn: &mut PgConnection,
        email: &str,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<Self, AppError> {
        let guest = sqlx::query_as::<_, Guest>(
            r#"
            INSERT INTO guests (email, first_name, last_name, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = COALESCE(EXCLUDED.phone, guests.phone),
                updated_at = NOW()
            RETURNING id, email, first_name, last_name, phone, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .fetch_one(conn)
        .await?;

        Ok(guest)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let guest = sqlx::query_as::<_, Guest>(
            r#"
            SELECT id, email, first_name, last_name, phone, created_at, updated_at
            FROM guests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(guest)
    }

    pub fn to_response(&self) -> GuestResponse {
        GuestResponse {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        }
    }
}
