//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use study_planner_core::ports::ScheduleStore;
use uuid::Uuid;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScheduleStore>,
    pub config: Arc<Config>,
}

/// The authenticated user for the current request, injected into request
/// extensions by the auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);
