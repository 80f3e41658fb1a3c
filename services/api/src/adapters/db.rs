//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ScheduleStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! A schedule's embedded collections (time blocks, recurrence rule, exceptions)
//! are stored as JSONB columns and round-tripped through serde, so the database
//! never sees them as anything but opaque documents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use study_planner_core::domain::{
    RecurrenceRule, Schedule, ScheduleException, TimeBlock, User, UserCredentials,
};
use study_planner_core::ports::{PortError, PortResult, ScheduleStore};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A PostgreSQL adapter that implements the `ScheduleStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct ScheduleRecord {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    description: Option<String>,
    is_active: bool,
    time_blocks: Json<Vec<TimeBlock>>,
    recurring: Json<RecurrenceRule>,
    exceptions: Json<Vec<ScheduleException>>,
}
impl ScheduleRecord {
    fn to_domain(self) -> Schedule {
        Schedule {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            is_active: self.is_active,
            time_blocks: self.time_blocks.0,
            recurring: self.recurring.0,
            exceptions: self.exceptions.0,
        }
    }
}

const SCHEDULE_COLUMNS: &str =
    "id, owner_id, name, description, is_active, time_blocks, recurring, exceptions";

//=========================================================================================
// `ScheduleStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ScheduleStore for PgStore {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Unexpected(format!("email {} is already registered", email))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("No user registered for {}", email))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn insert_schedule(&self, schedule: &Schedule) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO schedules \
             (id, owner_id, name, description, is_active, time_blocks, recurring, exceptions) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(schedule.id)
        .bind(schedule.owner_id)
        .bind(&schedule.name)
        .bind(&schedule.description)
        .bind(schedule.is_active)
        .bind(Json(&schedule.time_blocks))
        .bind(Json(&schedule.recurring))
        .bind(Json(&schedule.exceptions))
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_schedule(&self, owner_id: Uuid, schedule_id: Uuid) -> PortResult<Schedule> {
        let record = sqlx::query_as::<_, ScheduleRecord>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1 AND owner_id = $2"
        ))
        .bind(schedule_id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Schedule {} not found", schedule_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn list_schedules(
        &self,
        owner_id: Uuid,
        active: Option<bool>,
    ) -> PortResult<Vec<Schedule>> {
        let records = sqlx::query_as::<_, ScheduleRecord>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules \
             WHERE owner_id = $1 AND ($2::boolean IS NULL OR is_active = $2) \
             ORDER BY created_at ASC"
        ))
        .bind(owner_id)
        .bind(active)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn replace_schedule(&self, schedule: &Schedule) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE schedules SET name = $3, description = $4, is_active = $5, \
             time_blocks = $6, recurring = $7, exceptions = $8, updated_at = now() \
             WHERE id = $1 AND owner_id = $2",
        )
        .bind(schedule.id)
        .bind(schedule.owner_id)
        .bind(&schedule.name)
        .bind(&schedule.description)
        .bind(schedule.is_active)
        .bind(Json(&schedule.time_blocks))
        .bind(Json(&schedule.recurring))
        .bind(Json(&schedule.exceptions))
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Schedule {} not found",
                schedule.id
            )));
        }
        Ok(())
    }

    async fn delete_schedule(&self, owner_id: Uuid, schedule_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1 AND owner_id = $2")
            .bind(schedule_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Schedule {} not found",
                schedule_id
            )));
        }
        Ok(())
    }
}
