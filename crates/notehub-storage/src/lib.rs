//! NoteHub Storage Library
//!
//! Object storage abstraction for note files, with a hosted backend (Supabase
//! Storage over HTTP) and a local filesystem backend for development.
//!
//! # Storage key format
//!
//! `{branch_id}/{semester_id}/{subject_id}/{unit_id}/{millis}_{file_name}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use notehub_core::StorageBackend;
pub use supabase::SupabaseStorage;
pub use traits::{Storage, StorageError, StorageResult};
