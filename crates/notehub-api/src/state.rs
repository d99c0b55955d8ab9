//! Shared application state handed to every handler as `State<Arc<AppState>>`.

use crate::auth::IdentityProvider;
use crate::services::NoteDeletionService;
use notehub_core::models::AdminAllowList;
use notehub_db::{CatalogRepositoryTrait, DatabaseHealthTrait, NoteRepositoryTrait};
use notehub_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepositoryTrait>,
    pub notes: Arc<dyn NoteRepositoryTrait>,
    pub storage: Arc<dyn Storage>,
    pub identity: Arc<dyn IdentityProvider>,
    pub admins: AdminAllowList,
    pub deletion: NoteDeletionService,
    pub health: Arc<dyn DatabaseHealthTrait>,
    pub max_upload_size_bytes: usize,
}
