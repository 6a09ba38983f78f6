//! Conversion queue: submission boundary and worker pool.
//!
//! Jobs carry a media identifier and a list of conversion names; a worker
//! fetches the record and invokes the executor with bare-name requests.
//! Failed jobs are reported through tracing and are not retried here —
//! retry policy belongs to whatever supervises the queue.
//!
//! Shutdown: [`ConversionQueue::shutdown`] signals the pool to stop; it does
//! not wait for in-flight jobs. Allow time for running jobs to finish before
//! process exit.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Semaphore};
use uuid::Uuid;

use medley_core::{ConversionRequest, Media, MediaRepository};
use medley_processing::ConversionExecutor;

/// A queued request to derive the named conversions for one media item.
#[derive(Debug, Clone)]
pub struct PerformConversions {
    pub media_id: Uuid,
    pub conversions: Vec<String>,
}

#[derive(Clone)]
pub struct QueueConfig {
    /// Maximum number of jobs processed concurrently.
    pub max_workers: usize,
    /// Capacity of the submission channel; submits block once it fills.
    pub channel_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            channel_capacity: 256,
        }
    }
}

pub struct ConversionQueue {
    tx: mpsc::Sender<PerformConversions>,
    shutdown_tx: mpsc::Sender<()>,
}

impl ConversionQueue {
    /// Create a queue and spawn its worker pool on the current runtime.
    pub fn new(
        repository: Arc<dyn MediaRepository>,
        executor: Arc<ConversionExecutor>,
        config: QueueConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(Self::worker_pool(
            repository,
            executor,
            config,
            rx,
            shutdown_rx,
        ));

        Self { tx, shutdown_tx }
    }

    /// Submit a conversion job. Fails only once the queue has shut down.
    pub async fn submit(&self, media_id: Uuid, conversions: Vec<String>) -> Result<()> {
        self.tx
            .send(PerformConversions {
                media_id,
                conversions: conversions.clone(),
            })
            .await
            .map_err(|_| anyhow::anyhow!("Conversion queue is shut down"))?;

        tracing::info!(
            media_id = %media_id,
            conversions = ?conversions,
            "Conversion job submitted"
        );

        Ok(())
    }

    /// Enqueue conversions for a media item.
    pub async fn submit_for(&self, media: &Media, conversions: Vec<String>) -> Result<()> {
        self.submit(media.id, conversions).await
    }

    /// Signal the worker pool to stop. In-flight jobs are not awaited.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    async fn worker_pool(
        repository: Arc<dyn MediaRepository>,
        executor: Arc<ConversionExecutor>,
        config: QueueConfig,
        mut rx: mpsc::Receiver<PerformConversions>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let semaphore = Arc::new(Semaphore::new(config.max_workers));

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Conversion queue shutting down");
                    break;
                }
                job = rx.recv() => {
                    let Some(job) = job else { break };

                    let Ok(permit) = semaphore.clone().acquire_owned().await else {
                        break;
                    };

                    let repository = repository.clone();
                    let executor = executor.clone();

                    tokio::spawn(async move {
                        process_job(repository, executor, job).await;
                        drop(permit);
                    });
                }
            }
        }
    }
}

async fn process_job(
    repository: Arc<dyn MediaRepository>,
    executor: Arc<ConversionExecutor>,
    job: PerformConversions,
) {
    let media = match repository.find(job.media_id).await {
        Ok(media) => media,
        Err(e) => {
            tracing::error!(
                media_id = %job.media_id,
                error = %e,
                "Conversion job dropped, media record not found"
            );
            return;
        }
    };

    let requests: Vec<ConversionRequest> = job
        .conversions
        .iter()
        .map(|name| ConversionRequest::simple(name.clone()))
        .collect();

    match executor.apply(&media, &requests).await {
        Ok(()) => {
            tracing::info!(
                media_id = %media.id,
                conversions = ?job.conversions,
                "Conversion job completed"
            );
        }
        Err(e) => {
            tracing::error!(
                media_id = %media.id,
                conversions = ?job.conversions,
                error = %e,
                "Conversion job failed"
            );
        }
    }
}
