//! Conversion executor.
//!
//! Applies registered transforms to a media item's original file and persists
//! the derived artifacts at their derived paths. Application is idempotent
//! for bare-name requests: an artifact that already exists is skipped before
//! any source load or transform work happens.

use std::sync::Arc;

use medley_core::{ConversionRequest, Media};
use medley_storage::{DiskManager, StorageError};

use crate::codec;
use crate::error::{ConversionError, ConversionResult};
use crate::optimizer::ImageOptimizer;
use crate::registry::ConversionRegistry;

pub struct ConversionExecutor {
    registry: Arc<ConversionRegistry>,
    disks: Arc<DiskManager>,
    optimizer: Option<Arc<dyn ImageOptimizer>>,
}

impl ConversionExecutor {
    pub fn new(registry: Arc<ConversionRegistry>, disks: Arc<DiskManager>) -> Self {
        Self {
            registry,
            disks,
            optimizer: None,
        }
    }

    /// Attach an artifact optimizer. Absence is a construction-time decision;
    /// the executor never probes for one at apply time.
    pub fn with_optimizer(mut self, optimizer: Arc<dyn ImageOptimizer>) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Apply `requests` with check-before-write enabled for bare-name
    /// requests.
    pub async fn apply(
        &self,
        media: &Media,
        requests: &[ConversionRequest],
    ) -> ConversionResult<()> {
        self.apply_with(media, requests, true).await
    }

    /// Apply `requests`, using `only_if_missing` as the default for bare-name
    /// requests. Parameterized requests always re-render regardless.
    ///
    /// Non-image media is a no-op: callers pass arbitrary media through this
    /// code path and the conversion pipeline is image-specific. Failures
    /// abort the remaining batch; artifacts written by earlier requests stay
    /// persisted. Concurrent invocations for the same artifact are not
    /// serialized — both may render and the last writer wins.
    pub async fn apply_with(
        &self,
        media: &Media,
        requests: &[ConversionRequest],
        only_if_missing: bool,
    ) -> ConversionResult<()> {
        if !media.is_of_kind("image") {
            tracing::debug!(
                media_id = %media.id,
                content_type = %media.content_type,
                "Skipping conversions for non-image media"
            );
            return Ok(());
        }

        let storage = self.disks.disk(&media.disk)?;

        for request in requests {
            let spec = request.normalize(only_if_missing);
            let path = media.storage_path(&spec.output_segment);

            if spec.only_if_missing && storage.exists(&path).await? {
                tracing::debug!(
                    media_id = %media.id,
                    conversion = %spec.name,
                    key = %path,
                    "Conversion already exists, skipping"
                );
                continue;
            }

            let conversion = self.registry.get(&spec.name)?;

            let source_key = media.storage_path("");
            let source = match storage.download(&source_key).await {
                Ok(data) => data,
                Err(StorageError::NotFound(_)) => {
                    return Err(ConversionError::SourceNotFound(source_key));
                }
                Err(e) => return Err(e.into()),
            };

            let start = std::time::Instant::now();

            let image = codec::decode(&source)?;
            let result = conversion(image, &spec.args).map_err(ConversionError::Transform)?;
            let encoded = codec::encode(&result, &media.content_type)?;
            let size = encoded.len();

            storage.put(&path, encoded).await?;

            tracing::info!(
                media_id = %media.id,
                conversion = %spec.name,
                key = %path,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Conversion written"
            );

            self.optimize_artifact(media, storage.as_ref(), &path).await;
        }

        Ok(())
    }

    /// Best-effort artifact optimization; never fails the conversion.
    async fn optimize_artifact(
        &self,
        media: &Media,
        storage: &dyn medley_storage::Storage,
        key: &str,
    ) {
        let Some(optimizer) = &self.optimizer else {
            return;
        };

        match storage.absolute_path(key) {
            Ok(path) => {
                if let Err(e) = optimizer.optimize(&path).await {
                    tracing::warn!(
                        media_id = %media.id,
                        key = %key,
                        error = %e,
                        "Artifact optimization failed"
                    );
                }
            }
            Err(_) => {
                tracing::debug!(
                    key = %key,
                    "Storage backend has no filesystem paths, skipping optimization"
                );
            }
        }
    }
}
