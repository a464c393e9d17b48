use std::{
    io::{self, Write},
    path::Path,
};

use bytes::Bytes;
use tempfile::NamedTempFile;

/// Uploaded audio stored on disk for the duration of one request
///
/// The file is deleted when this value is dropped, whatever path the request
/// takes. [`AudioFile::close`] deletes it eagerly and reports failures.
#[derive(Debug)]
pub(crate) struct AudioFile {
    file: NamedTempFile,
}

impl AudioFile {
    /// Write `bytes` to a fresh temporary file named after the upload's extension
    pub async fn persist(filename: &str, bytes: Bytes) -> io::Result<Self> {
        let suffix = upload_suffix(filename);

        tokio::task::spawn_blocking(move || {
            let mut file = tempfile::Builder::new().prefix("koe-").suffix(&suffix).tempfile()?;
            file.write_all(&bytes)?;
            file.flush()?;

            Ok(Self { file })
        })
        .await
        .map_err(io::Error::other)?
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}

/// Extension of the uploaded filename including the dot, or empty
///
/// `meeting.mp3` gives `.mp3`, `archive.tar.gz` gives `.gz`, and names
/// without an extension (including dotfiles such as `.env`) give nothing.
pub(crate) fn upload_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}
