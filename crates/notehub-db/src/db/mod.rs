//! Database repositories for data access layer
//!
//! Each repository exposes a trait (so the API layer can swap in other
//! implementations) and a PostgreSQL implementation.

pub mod catalog;
pub mod deletion_audit;
pub mod health;
pub mod note;

pub use catalog::{CatalogRepositoryTrait, PostgresCatalogRepository};
pub use deletion_audit::{DeletionAuditRepositoryTrait, PostgresDeletionAuditRepository};
pub use health::{DatabaseHealthTrait, PostgresHealthCheck};
pub use note::{NoteRepositoryTrait, PostgresNoteRepository};
