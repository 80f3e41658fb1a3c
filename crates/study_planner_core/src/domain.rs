//! crates/study_planner_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP wire format.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a time block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Study,
    Break,
    Exercise,
    Other,
}

/// Priority of a time block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// How often a schedule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

/// A single contiguous interval on one weekday.
///
/// `day_of_week` is 0-6 with 0 = Sunday. Times are wall-clock hour:minute
/// with no date or timezone component; a block never wraps midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: Uuid,
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject: String,
    /// Opaque reference to an external task, if any.
    pub task_id: Option<Uuid>,
    pub kind: BlockKind,
    pub priority: Priority,
    pub notes: Option<String>,
}

/// Recurrence descriptor for a schedule, anchored at `start_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub is_recurring: bool,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Restricts weekly recurrence to these weekdays (0-6, 0 = Sunday).
    /// Independent of the weekdays carried by the time blocks.
    pub days_of_week: Option<Vec<u8>>,
}

/// What an exception does to the occurrence on its date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ExceptionAction {
    /// Suppress the occurrence entirely.
    Skip,
    /// Replace the normal blocks with this ad-hoc list. The blocks apply to
    /// the exception date directly; their `day_of_week` is not consulted.
    Modify { blocks: Vec<TimeBlock> },
}

/// A date-scoped override of the normal recurrence. At most one exception
/// may exist per calendar date within a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleException {
    pub date: NaiveDate,
    pub reason: String,
    pub action: ExceptionAction,
}

/// A named weekly recurring schedule owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub time_blocks: Vec<TimeBlock>,
    pub recurring: RecurrenceRule,
    pub exceptions: Vec<ScheduleException>,
}

/// A partial update to a schedule. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ScheduleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub time_blocks: Option<Vec<TimeBlock>>,
    pub recurring: Option<RecurrenceRule>,
    pub exceptions: Option<Vec<ScheduleException>>,
}

/// One concrete calendar-date instantiation of a schedule, after
/// exceptions have been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub blocks: Vec<TimeBlock>,
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}
