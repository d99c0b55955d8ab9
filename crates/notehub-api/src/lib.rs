//! NoteHub API Library
//!
//! HTTP handlers, the audited note-deletion workflow, middleware and
//! application setup for the note-sharing portal.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use services::{DeletionAuditLogger, NoteDeletionService};
pub use setup::routes::{build_router, RouterSettings};
pub use state::AppState;
