use async_trait::async_trait;
use tracing::info;

use crate::{Capture, CaptureSource};

/// Placeholder for an object-storage backend (S3, Cloudinary, ...).
/// Lists nothing until a real client is wired in.
#[derive(Debug, Default)]
pub struct ExternalStorage;

#[async_trait]
impl CaptureSource for ExternalStorage {
    async fn list_captures(&self) -> Vec<Capture> {
        info!("using external storage (placeholder implementation)");
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "external"
    }
}
