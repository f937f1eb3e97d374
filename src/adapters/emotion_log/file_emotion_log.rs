//! File-based Emotion Log Adapter
//!
//! Appends one line per detected emotion to a plain text file:
//!
//! ```text
//! 2025-06-01 21:04:09 - Emotion: nostalgic
//! ```
//!
//! The file and any missing parent directories are created on first write.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::ports::{EmotionLog, EmotionLogEntry, EmotionLogError};

/// Emotion log backed by an append-only text file.
#[derive(Debug, Clone)]
pub struct FileEmotionLog {
    path: PathBuf,
}

impl FileEmotionLog {
    /// Create a log that appends to `path`.
    ///
    /// # Example
    /// ```ignore
    /// let log = FileEmotionLog::new("./data/EmotionLog.txt");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> Result<(), EmotionLogError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| EmotionLogError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl EmotionLog for FileEmotionLog {
    async fn record(&self, entry: EmotionLogEntry) -> Result<(), EmotionLogError> {
        self.ensure_parent().await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| EmotionLogError::IoError(e.to_string()))?;

        let mut line = entry.to_line();
        line.push('\n');

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| EmotionLogError::IoError(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| EmotionLogError::IoError(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), label = %entry.label, "emotion recorded");
        Ok(())
    }
}
