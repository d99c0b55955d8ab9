//! Data models for the portal
//!
//! Catalog hierarchy (branch → semester → subject → unit), notes, the deletion
//! audit trail and the admin identity types.

mod admin;
mod audit;
mod catalog;
mod note;

pub use admin::*;
pub use audit::*;
pub use catalog::*;
pub use note::*;
