use std::path::Path;

use thiserror::Error;

use crate::ClientError;

/// A file picked for preview or submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Failures caught before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("only PDF files are allowed: {0}")]
    NotPdf(String),
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a PDF from disk. Only `.pdf` names are accepted.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if !is_pdf_name(&name) {
            return Err(ValidationError::NotPdf(name).into());
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Reject files above `limit` bytes.
    pub fn check_size(&self, limit: u64) -> Result<(), ValidationError> {
        let size = self.size();
        if size > limit {
            return Err(ValidationError::FileTooLarge { size, limit });
        }
        Ok(())
    }
}

fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
