//! Diagnostics sink: where failure-path captures go.
//!
//! The resolver pulls screenshot bytes from the backend itself and hands
//! them here, so a sink stays a dumb store and backends without screenshot
//! support still leave a labeled capture event behind.

use async_trait::async_trait;
use resilo_common::error::CaptureError;
use std::path::PathBuf;

/// Reference to a stored diagnostic artifact.
#[derive(Debug, Clone)]
pub struct ArtifactRef {
    pub label: String,
    /// Where the artifact landed; `None` when nothing was persisted.
    pub path: Option<PathBuf>,
}

#[async_trait]
pub trait DiagnosticsSink: Send + Sync {
    /// Record one capture keyed to a logical target label.
    async fn capture(
        &mut self,
        label: &str,
        image: Option<&[u8]>,
    ) -> Result<ArtifactRef, CaptureError>;
}

/// Sink that stores nothing. Useful for embedding the resolver in tests.
#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl DiagnosticsSink for NullSink {
    async fn capture(
        &mut self,
        label: &str,
        _image: Option<&[u8]>,
    ) -> Result<ArtifactRef, CaptureError> {
        Ok(ArtifactRef {
            label: label.to_string(),
            path: None,
        })
    }
}

/// Sink that writes screenshots into a directory, one numbered file per
/// capture.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    seq: u32,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            seq: 0,
        }
    }

    fn sanitize(label: &str) -> String {
        label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect()
    }
}

#[async_trait]
impl DiagnosticsSink for DirectorySink {
    async fn capture(
        &mut self,
        label: &str,
        image: Option<&[u8]>,
    ) -> Result<ArtifactRef, CaptureError> {
        let Some(bytes) = image else {
            return Ok(ArtifactRef {
                label: label.to_string(),
                path: None,
            });
        };

        tokio::fs::create_dir_all(&self.root).await?;
        self.seq += 1;
        let file = self
            .root
            .join(format!("{:03}-{}.png", self.seq, Self::sanitize(label)));
        tokio::fs::write(&file, bytes).await?;

        Ok(ArtifactRef {
            label: label.to_string(),
            path: Some(file),
        })
    }
}
