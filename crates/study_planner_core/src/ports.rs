//! crates/study_planner_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Schedule, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence and identity boundary for the schedule core.
///
/// Every schedule access is scoped to its owner: a lookup with the wrong
/// `owner_id` behaves exactly like a missing schedule.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    // --- Auth Methods ---
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Schedule Management ---
    async fn insert_schedule(&self, schedule: &Schedule) -> PortResult<()>;

    async fn get_schedule(&self, owner_id: Uuid, schedule_id: Uuid) -> PortResult<Schedule>;

    /// Lists the owner's schedules, optionally filtered on `is_active`.
    async fn list_schedules(&self, owner_id: Uuid, active: Option<bool>)
        -> PortResult<Vec<Schedule>>;

    /// Replaces a stored schedule with a fully validated new state.
    async fn replace_schedule(&self, schedule: &Schedule) -> PortResult<()>;

    async fn delete_schedule(&self, owner_id: Uuid, schedule_id: Uuid) -> PortResult<()>;
}
