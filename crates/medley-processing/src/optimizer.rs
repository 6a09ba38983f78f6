//! Optional post-processing of written artifacts.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;

/// Size optimizer applied to a freshly written artifact, keyed by its
/// absolute filesystem path.
///
/// Injected into the executor as an optional collaborator at construction
/// time. The executor reports failures at warn level and never fails the
/// conversion over them.
#[async_trait]
pub trait ImageOptimizer: Send + Sync {
    async fn optimize(&self, path: &Path) -> anyhow::Result<()>;
}

/// Runs an external optimizer binary against the file in place, e.g.
/// `jpegoptim --strip-all <file>` or `oxipng -o 2 <file>`.
pub struct CommandOptimizer {
    program: String,
    args: Vec<String>,
}

impl CommandOptimizer {
    /// The optimizer is invoked as `program [args..] <file>`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl ImageOptimizer for CommandOptimizer {
    async fn optimize(&self, path: &Path) -> anyhow::Result<()> {
        let start = std::time::Instant::now();

        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .await
            .with_context(|| format!("Failed to spawn optimizer: {}", self.program))?;

        if !status.success() {
            anyhow::bail!("Optimizer {} exited with {}", self.program, status);
        }

        tracing::debug!(
            program = %self.program,
            path = %path.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Artifact optimized"
        );

        Ok(())
    }
}
