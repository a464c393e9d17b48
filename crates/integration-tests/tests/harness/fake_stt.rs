//! In-process transcriber double
//!
//! Records where the server stored the upload and whether the file existed
//! while it was being transcribed.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stt::{SttError, Transcriber};

/// What the transcriber observed during one call
#[derive(Debug, Clone)]
pub struct Observed {
    pub path: PathBuf,
    pub existed: bool,
    pub contents: Vec<u8>,
    pub language: String,
}

impl Observed {
    /// File name suffix including the dot, empty when there is none
    pub fn suffix(&self) -> String {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }
}

enum Outcome {
    Text(String),
    Fail(String),
}

/// Transcriber returning a fixed outcome
pub struct FakeTranscriber {
    outcome: Outcome,
    observed: Mutex<Vec<Observed>>,
}

impl FakeTranscriber {
    /// Always transcribe to `text`
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Text(text.to_owned()),
            observed: Mutex::new(Vec::new()),
        })
    }

    /// Always fail with `message`
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Fail(message.to_owned()),
            observed: Mutex::new(Vec::new()),
        })
    }

    /// Most recent call, if any
    pub fn last(&self) -> Option<Observed> {
        self.observed.lock().unwrap().last().cloned()
    }

    pub fn calls(&self) -> usize {
        self.observed.lock().unwrap().len()
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio: &Path, language: &str) -> stt::Result<String> {
        let contents = tokio::fs::read(audio).await.unwrap_or_default();

        self.observed.lock().unwrap().push(Observed {
            path: audio.to_path_buf(),
            existed: audio.exists(),
            contents,
            language: language.to_owned(),
        });

        match &self.outcome {
            Outcome::Text(text) => Ok(text.clone()),
            Outcome::Fail(message) => Err(SttError::ModelError(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}
