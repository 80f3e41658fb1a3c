pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the handlers the server binary wires into the router.
pub use middleware::require_auth;
pub use rest::{
    add_block_handler, check_conflicts_handler, create_schedule_handler, delete_schedule_handler,
    get_schedule_handler, list_occurrences_handler, list_schedules_handler, remove_block_handler,
    toggle_schedule_handler, update_schedule_handler,
};
