pub mod deletion_audit;
pub mod note_deletion;
pub mod note_locks;

pub use deletion_audit::DeletionAuditLogger;
pub use note_deletion::NoteDeletionService;
pub use note_locks::NoteLocks;
