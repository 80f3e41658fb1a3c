//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! This layer is the syntactic gate in front of the core: days must be 0-6,
//! times must match HH:MM, subjects must be non-empty. Semantic overlap
//! validation stays in `study_planner_core`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_planner_core::domain::{
    BlockKind, ExceptionAction, Frequency, Occurrence, Priority, RecurrenceRule, Schedule,
    ScheduleException, ScheduleUpdate, TimeBlock,
};
use study_planner_core::ports::PortError;
use study_planner_core::schedule::ScheduleError;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::state::{AppState, AuthUser};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        create_schedule_handler,
        list_schedules_handler,
        get_schedule_handler,
        update_schedule_handler,
        delete_schedule_handler,
        toggle_schedule_handler,
        add_block_handler,
        remove_block_handler,
        check_conflicts_handler,
        list_occurrences_handler,
    ),
    components(
        schemas(
            crate::web::auth::SignupRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::AuthResponse,
            TimeBlockPayload,
            RecurrencePayload,
            ExceptionPayload,
            ExceptionActionKind,
            CreateSchedulePayload,
            UpdateSchedulePayload,
            TimeBlockResponse,
            ExceptionResponse,
            ScheduleResponse,
            OccurrenceResponse,
            ConflictCheckResponse,
        )
    ),
    tags(
        (name = "Study Planner API", description = "Weekly recurring study schedules with conflict detection.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Wire Payloads (requests)
//=========================================================================================

/// A time block as it appears on the wire. Times are `HH:MM` 24-hour strings.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TimeBlockPayload {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
    pub task_id: Option<Uuid>,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "study")]
    pub kind: BlockKind,
    #[schema(value_type = String, example = "medium")]
    pub priority: Priority,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecurrencePayload {
    pub is_recurring: bool,
    #[schema(value_type = String, example = "weekly")]
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub days_of_week: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionActionKind {
    Skip,
    Modify,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExceptionPayload {
    pub date: NaiveDate,
    pub reason: String,
    pub action: ExceptionActionKind,
    /// Required when `action` is `modify`; the blocks replacing the normal
    /// ones on that date.
    #[serde(default)]
    pub modified_time_blocks: Option<Vec<TimeBlockPayload>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSchedulePayload {
    pub name: String,
    pub description: Option<String>,
    pub time_blocks: Vec<TimeBlockPayload>,
    pub recurring: RecurrencePayload,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSchedulePayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub time_blocks: Option<Vec<TimeBlockPayload>>,
    pub recurring: Option<RecurrencePayload>,
    pub exceptions: Option<Vec<ExceptionPayload>>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct OccurrencesQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

//=========================================================================================
// Wire Payloads (responses)
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeBlockResponse {
    pub id: Uuid,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
    pub task_id: Option<Uuid>,
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: BlockKind,
    #[schema(value_type = String)]
    pub priority: Priority,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExceptionResponse {
    pub date: NaiveDate,
    pub reason: String,
    pub action: ExceptionActionKind,
    pub modified_time_blocks: Option<Vec<TimeBlockResponse>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub time_blocks: Vec<TimeBlockResponse>,
    pub recurring: RecurrencePayload,
    pub exceptions: Vec<ExceptionResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OccurrenceResponse {
    pub date: NaiveDate,
    pub blocks: Vec<TimeBlockResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictCheckResponse {
    pub has_conflicts: bool,
}

impl From<&TimeBlock> for TimeBlockResponse {
    fn from(block: &TimeBlock) -> Self {
        Self {
            id: block.id,
            day_of_week: block.day_of_week,
            start_time: block.start_time.format("%H:%M").to_string(),
            end_time: block.end_time.format("%H:%M").to_string(),
            subject: block.subject.clone(),
            task_id: block.task_id,
            kind: block.kind,
            priority: block.priority,
            notes: block.notes.clone(),
        }
    }
}

impl From<&ScheduleException> for ExceptionResponse {
    fn from(exception: &ScheduleException) -> Self {
        let (action, blocks) = match &exception.action {
            ExceptionAction::Skip => (ExceptionActionKind::Skip, None),
            ExceptionAction::Modify { blocks } => (
                ExceptionActionKind::Modify,
                Some(blocks.iter().map(TimeBlockResponse::from).collect()),
            ),
        };
        Self {
            date: exception.date,
            reason: exception.reason.clone(),
            action,
            modified_time_blocks: blocks,
        }
    }
}

impl From<&RecurrenceRule> for RecurrencePayload {
    fn from(rule: &RecurrenceRule) -> Self {
        Self {
            is_recurring: rule.is_recurring,
            frequency: rule.frequency,
            start_date: rule.start_date,
            end_date: rule.end_date,
            days_of_week: rule.days_of_week.clone(),
        }
    }
}

impl From<&Schedule> for ScheduleResponse {
    fn from(schedule: &Schedule) -> Self {
        Self {
            id: schedule.id,
            owner_id: schedule.owner_id,
            name: schedule.name.clone(),
            description: schedule.description.clone(),
            is_active: schedule.is_active,
            time_blocks: schedule.time_blocks.iter().map(Into::into).collect(),
            recurring: (&schedule.recurring).into(),
            exceptions: schedule.exceptions.iter().map(Into::into).collect(),
        }
    }
}

impl From<&Occurrence> for OccurrenceResponse {
    fn from(occurrence: &Occurrence) -> Self {
        Self {
            date: occurrence.date,
            blocks: occurrence.blocks.iter().map(Into::into).collect(),
        }
    }
}

//=========================================================================================
// Wire Validation (syntactic gate)
//=========================================================================================

type Rejection = (StatusCode, String);

fn bad_request(message: impl Into<String>) -> Rejection {
    (StatusCode::BAD_REQUEST, message.into())
}

/// Parses a strict `HH:MM` 24-hour time.
fn parse_wire_time(field: &str, value: &str) -> Result<NaiveTime, Rejection> {
    if value.len() != 5 {
        return Err(bad_request(format!("{field} must match HH:MM, got '{value}'")));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| bad_request(format!("{field} must match HH:MM, got '{value}'")))
}

fn block_from_payload(payload: TimeBlockPayload) -> Result<TimeBlock, Rejection> {
    if payload.day_of_week > 6 {
        return Err(bad_request(format!(
            "day_of_week must be 0-6, got {}",
            payload.day_of_week
        )));
    }
    if payload.subject.trim().is_empty() {
        return Err(bad_request("subject must not be empty"));
    }
    let start_time = parse_wire_time("start_time", &payload.start_time)?;
    let end_time = parse_wire_time("end_time", &payload.end_time)?;
    Ok(TimeBlock {
        id: Uuid::new_v4(),
        day_of_week: payload.day_of_week,
        start_time,
        end_time,
        subject: payload.subject,
        task_id: payload.task_id,
        kind: payload.kind,
        priority: payload.priority,
        notes: payload.notes,
    })
}

fn blocks_from_payload(payloads: Vec<TimeBlockPayload>) -> Result<Vec<TimeBlock>, Rejection> {
    payloads.into_iter().map(block_from_payload).collect()
}

fn recurrence_from_payload(payload: RecurrencePayload) -> Result<RecurrenceRule, Rejection> {
    if let Some(days) = &payload.days_of_week {
        if let Some(bad) = days.iter().find(|d| **d > 6) {
            return Err(bad_request(format!("days_of_week must be 0-6, got {bad}")));
        }
    }
    Ok(RecurrenceRule {
        is_recurring: payload.is_recurring,
        frequency: payload.frequency,
        start_date: payload.start_date,
        end_date: payload.end_date,
        days_of_week: payload.days_of_week,
    })
}

fn exception_from_payload(payload: ExceptionPayload) -> Result<ScheduleException, Rejection> {
    let action = match payload.action {
        ExceptionActionKind::Skip => ExceptionAction::Skip,
        ExceptionActionKind::Modify => {
            let blocks = payload.modified_time_blocks.ok_or_else(|| {
                bad_request("a 'modify' exception requires modified_time_blocks")
            })?;
            ExceptionAction::Modify {
                blocks: blocks_from_payload(blocks)?,
            }
        }
    };
    Ok(ScheduleException {
        date: payload.date,
        reason: payload.reason,
        action,
    })
}

//=========================================================================================
// Error Mapping
//=========================================================================================

fn reject_schedule_error(e: ScheduleError) -> Rejection {
    match e {
        ScheduleError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        ScheduleError::Conflict { .. } => (StatusCode::CONFLICT, e.to_string()),
    }
}

fn reject_port_error(e: PortError) -> Rejection {
    match e {
        PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(message) => {
            error!("Store operation failed: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new schedule.
#[utoipa::path(
    post,
    path = "/schedules",
    request_body = CreateSchedulePayload,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleResponse),
        (status = 400, description = "Malformed field"),
        (status = 409, description = "Two time blocks overlap on the same day"),
    )
)]
pub async fn create_schedule_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(payload): Json<CreateSchedulePayload>,
) -> Result<impl IntoResponse, Rejection> {
    let blocks = blocks_from_payload(payload.time_blocks)?;
    let recurring = recurrence_from_payload(payload.recurring)?;
    let schedule = Schedule::create(user_id, payload.name, payload.description, blocks, recurring)
        .map_err(reject_schedule_error)?;

    state
        .store
        .insert_schedule(&schedule)
        .await
        .map_err(reject_port_error)?;
    Ok((StatusCode::CREATED, Json(ScheduleResponse::from(&schedule))))
}

/// List the caller's schedules, optionally filtered by active flag.
#[utoipa::path(
    get,
    path = "/schedules",
    params(("active" = Option<bool>, Query, description = "Only active (or inactive) schedules")),
    responses((status = 200, description = "Schedules owned by the caller", body = [ScheduleResponse]))
)]
pub async fn list_schedules_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Rejection> {
    let schedules = state
        .store
        .list_schedules(user_id, query.active)
        .await
        .map_err(reject_port_error)?;
    let body: Vec<ScheduleResponse> = schedules.iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Fetch one schedule owned by the caller.
#[utoipa::path(
    get,
    path = "/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "The schedule", body = ScheduleResponse),
        (status = 404, description = "Not found or not owned by the caller"),
    )
)]
pub async fn get_schedule_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    let schedule = state
        .store
        .get_schedule(user_id, schedule_id)
        .await
        .map_err(reject_port_error)?;
    Ok(Json(ScheduleResponse::from(&schedule)))
}

/// Partially update a schedule. The update is atomic: a conflict in the new
/// block list rejects the whole request and stores nothing.
#[utoipa::path(
    put,
    path = "/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule id")),
    request_body = UpdateSchedulePayload,
    responses(
        (status = 200, description = "Updated schedule", body = ScheduleResponse),
        (status = 400, description = "Malformed field"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Two time blocks overlap on the same day"),
    )
)]
pub async fn update_schedule_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(schedule_id): Path<Uuid>,
    Json(payload): Json<UpdateSchedulePayload>,
) -> Result<impl IntoResponse, Rejection> {
    let update = ScheduleUpdate {
        name: payload.name,
        description: payload.description,
        is_active: payload.is_active,
        time_blocks: payload.time_blocks.map(blocks_from_payload).transpose()?,
        recurring: payload.recurring.map(recurrence_from_payload).transpose()?,
        exceptions: payload
            .exceptions
            .map(|list| {
                list.into_iter()
                    .map(exception_from_payload)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?,
    };

    let current = state
        .store
        .get_schedule(user_id, schedule_id)
        .await
        .map_err(reject_port_error)?;
    let updated = current.apply_update(update).map_err(reject_schedule_error)?;
    state
        .store
        .replace_schedule(&updated)
        .await
        .map_err(reject_port_error)?;
    Ok(Json(ScheduleResponse::from(&updated)))
}

/// Delete a schedule and everything embedded in it.
#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
    )
)]
pub async fn delete_schedule_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    state
        .store
        .delete_schedule(user_id, schedule_id)
        .await
        .map_err(reject_port_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip the schedule's active flag.
#[utoipa::path(
    post,
    path = "/schedules/{id}/toggle",
    params(("id" = Uuid, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Updated schedule", body = ScheduleResponse),
        (status = 404, description = "Not found"),
    )
)]
pub async fn toggle_schedule_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    let toggled = state
        .store
        .get_schedule(user_id, schedule_id)
        .await
        .map_err(reject_port_error)?
        .toggled();
    state
        .store
        .replace_schedule(&toggled)
        .await
        .map_err(reject_port_error)?;
    Ok(Json(ScheduleResponse::from(&toggled)))
}

/// Add one time block, checked against the existing blocks on its weekday.
#[utoipa::path(
    post,
    path = "/schedules/{id}/blocks",
    params(("id" = Uuid, Path, description = "Schedule id")),
    request_body = TimeBlockPayload,
    responses(
        (status = 201, description = "Updated schedule", body = ScheduleResponse),
        (status = 400, description = "Malformed field"),
        (status = 404, description = "Not found"),
        (status = 409, description = "The block overlaps an existing one"),
    )
)]
pub async fn add_block_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(schedule_id): Path<Uuid>,
    Json(payload): Json<TimeBlockPayload>,
) -> Result<impl IntoResponse, Rejection> {
    let block = block_from_payload(payload)?;
    let current = state
        .store
        .get_schedule(user_id, schedule_id)
        .await
        .map_err(reject_port_error)?;
    let updated = current.with_block(block).map_err(reject_schedule_error)?;
    state
        .store
        .replace_schedule(&updated)
        .await
        .map_err(reject_port_error)?;
    Ok((StatusCode::CREATED, Json(ScheduleResponse::from(&updated))))
}

/// Remove one time block. Removing an unknown block id is a no-op, not an
/// error.
#[utoipa::path(
    delete,
    path = "/schedules/{id}/blocks/{block_id}",
    params(
        ("id" = Uuid, Path, description = "Schedule id"),
        ("block_id" = Uuid, Path, description = "Time block id"),
    ),
    responses(
        (status = 200, description = "Updated schedule", body = ScheduleResponse),
        (status = 404, description = "Schedule not found"),
    )
)]
pub async fn remove_block_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path((schedule_id, block_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, Rejection> {
    let updated = state
        .store
        .get_schedule(user_id, schedule_id)
        .await
        .map_err(reject_port_error)?
        .without_block(block_id);
    state
        .store
        .replace_schedule(&updated)
        .await
        .map_err(reject_port_error)?;
    Ok(Json(ScheduleResponse::from(&updated)))
}

/// Recompute overlap status across all stored blocks.
#[utoipa::path(
    get,
    path = "/schedules/{id}/conflicts",
    params(("id" = Uuid, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Conflict status", body = ConflictCheckResponse),
        (status = 404, description = "Not found"),
    )
)]
pub async fn check_conflicts_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse, Rejection> {
    let schedule = state
        .store
        .get_schedule(user_id, schedule_id)
        .await
        .map_err(reject_port_error)?;
    Ok(Json(ConflictCheckResponse {
        has_conflicts: schedule.has_conflicts(),
    }))
}

/// Project the schedule onto concrete calendar dates, exceptions applied.
#[utoipa::path(
    get,
    path = "/schedules/{id}/occurrences",
    params(
        ("id" = Uuid, Path, description = "Schedule id"),
        ("from" = NaiveDate, Query, description = "First date of the range (inclusive)"),
        ("to" = NaiveDate, Query, description = "Last date of the range (inclusive)"),
    ),
    responses(
        (status = 200, description = "Occurrences in the range", body = [OccurrenceResponse]),
        (status = 400, description = "Invalid range"),
        (status = 404, description = "Not found"),
    )
)]
pub async fn list_occurrences_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(schedule_id): Path<Uuid>,
    Query(query): Query<OccurrencesQuery>,
) -> Result<impl IntoResponse, Rejection> {
    if query.from > query.to {
        return Err(bad_request("'from' must not be after 'to'"));
    }
    let schedule = state
        .store
        .get_schedule(user_id, schedule_id)
        .await
        .map_err(reject_port_error)?;
    let body: Vec<OccurrenceResponse> = schedule
        .project_occurrences(query.from, query.to)
        .map(|occurrence| OccurrenceResponse::from(&occurrence))
        .collect();
    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(day: u8, start: &str, end: &str) -> TimeBlockPayload {
        TimeBlockPayload {
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            subject: "Math".to_string(),
            task_id: None,
            kind: BlockKind::Study,
            priority: Priority::Medium,
            notes: None,
        }
    }

    #[test]
    fn hh_mm_times_are_parsed() {
        let block = block_from_payload(payload(1, "09:00", "10:30")).unwrap();
        assert_eq!(block.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(block.end_time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }

    #[test]
    fn loose_time_formats_are_rejected() {
        for bad in ["9:00", "09:00:00", "0900", "24:00", "09:60", "late"] {
            let result = block_from_payload(payload(1, bad, "10:00"));
            assert!(result.is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn out_of_range_day_is_rejected() {
        let (status, _) = block_from_payload(payload(7, "09:00", "10:00")).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_subject_is_rejected() {
        let mut p = payload(1, "09:00", "10:00");
        p.subject = "  ".to_string();
        assert!(block_from_payload(p).is_err());
    }

    #[test]
    fn modify_exception_requires_replacement_blocks() {
        let result = exception_from_payload(ExceptionPayload {
            date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            reason: "rescheduled".to_string(),
            action: ExceptionActionKind::Modify,
            modified_time_blocks: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn skip_exception_converts_without_blocks() {
        let exception = exception_from_payload(ExceptionPayload {
            date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            reason: "holiday".to_string(),
            action: ExceptionActionKind::Skip,
            modified_time_blocks: None,
        })
        .unwrap();
        assert_eq!(exception.action, ExceptionAction::Skip);
    }

    #[test]
    fn response_times_round_trip_as_hh_mm() {
        let block = block_from_payload(payload(1, "09:05", "10:00")).unwrap();
        let response = TimeBlockResponse::from(&block);
        assert_eq!(response.start_time, "09:05");
        assert_eq!(response.end_time, "10:00");
    }
}
