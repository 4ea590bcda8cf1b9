use async_trait::async_trait;

use crate::error::Result;
use crate::models::ImageRef;

/// Port for the device camera
#[async_trait]
pub trait CameraCapture: Send + Sync {
    /// Capture a photo
    ///
    /// Fails with `PermissionDenied` or `UserCancelled`; neither is fatal to the caller.
    async fn capture(&self) -> Result<ImageRef>;
}
