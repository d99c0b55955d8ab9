use crate::{LocalStorage, Storage, StorageBackend, StorageError, StorageResult, SupabaseStorage};
use notehub_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        StorageBackend::Supabase => {
            let url = config.supabase_url().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_URL not configured".to_string())
            })?;
            let key = config
                .supabase_service_role_key()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError(
                        "SUPABASE_SERVICE_ROLE_KEY not configured".to_string(),
                    )
                })?;

            let storage = SupabaseStorage::new(url, key, config.storage_bucket().to_string())?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }
    }
}
