use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs::File as TokioFile;
use tokio::io::{AsyncWriteExt, BufWriter as TokioBufWriter};
use crate::error::Result;
use crate::models::OutputRecord;

/// Destination for emitted records.
#[async_trait]
pub trait RecordSink: Send {
    async fn write_record(&mut self, record: &OutputRecord) -> Result<()>;
}

/// Collects records in memory.
#[async_trait]
impl RecordSink for Vec<OutputRecord> {
    async fn write_record(&mut self, record: &OutputRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonWriter {
    writer: TokioBufWriter<TokioFile>,
    path: PathBuf,
    count: usize,
}

impl JsonWriter {
    /// Creates the file, and its parent directory if needed, truncating any
    /// previous content.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = TokioFile::create(&path).await?;

        Ok(Self {
            writer: TokioBufWriter::new(file),
            path,
            count: 0,
        })
    }

    pub async fn finish(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    pub fn get_count(&self) -> usize {
        self.count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonWriter {
    async fn write_record(&mut self, record: &OutputRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.count += 1;

        // Flush periodically (every 10 records)
        if self.count % 10 == 0 {
            self.writer.flush().await?;
        }

        Ok(())
    }
}
