//! Capture discovery behind a pluggable storage adapter.
//!
//! Records are derived fresh from storage on every call; nothing is cached.

mod external;
mod local;
mod record;

use std::sync::Arc;

use async_trait::async_trait;
use cosmic_config::{AppConfig, StorageKind};
use tracing::info;

pub use external::ExternalStorage;
pub use local::{check_date_layout, resolve_image, LocalStorage, DEFAULT_URL_PREFIX, IMAGE_EXTENSIONS, METADATA_FILE};
pub use record::{Capture, CaptureMetadata};

/// Anything that can enumerate captures.
///
/// Implementations absorb their own failures: a broken backend yields an
/// empty or partial list and logs why.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn list_captures(&self) -> Vec<Capture>;

    fn name(&self) -> &'static str;
}

pub fn from_app_config(config: &AppConfig) -> Arc<dyn CaptureSource> {
    let source: Arc<dyn CaptureSource> = match config.storage_type {
        StorageKind::Local => Arc::new(LocalStorage::new(config.image_dir.clone())),
        StorageKind::External => Arc::new(ExternalStorage),
    };
    info!(storage = %config.storage_type, backend = source.name(), "capture storage ready");
    source
}
