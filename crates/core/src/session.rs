//! The upload → configure → generate → result lifecycle.
//!
//! [`Session`] is the only state machine in the crate:
//!
//! ```text
//! Idle --generate--> Loading --ok--> Success
//!                           \--err-> Error
//! any --acquire--> Idle
//! ```
//!
//! Every mutation goes through a method on `Session`, and every failure is
//! converted to a plain message stored in [`Session::error`] before it is
//! handed back to the caller.

use crate::error::{AppError, Result};
use crate::file_codec::{self, FileCodec, SelectedFile, SourceImage};
use crate::generation::{compose_instructions, GenerationRequest, ImageGenerator};
use crate::presets::{self, StylePreset};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of saved result files.
pub const DOWNLOAD_PREFIX: &str = "proshot-ai";

/// Media type the service's output is presented and saved as.
pub const RESULT_MEDIA_TYPE: &str = "image/png";

/// Lifecycle status of the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Base64 payload of a generated image, stored exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult(String);

impl GenerationResult {
    pub fn payload(&self) -> &str {
        &self.0
    }

    /// The `data:` URL the result is displayed from.
    pub fn data_url(&self) -> String {
        file_codec::data_url(RESULT_MEDIA_TYPE, &self.0)
    }
}

/// File name for a result saved at `now`.
pub fn download_file_name(now: DateTime<Utc>) -> String {
    format!("{}-{}.png", DOWNLOAD_PREFIX, now.timestamp_millis())
}

/// In-memory state of one editing session.
#[derive(Debug)]
pub struct Session {
    codec: FileCodec,
    source: Option<SourceImage>,
    preset: Option<&'static StylePreset>,
    instructions: String,
    result: Option<GenerationResult>,
    status: GenerationStatus,
    error: Option<String>,
    ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FileCodec::default())
    }
}

impl Session {
    /// Creates a session with the first style pre-selected.
    pub fn new(codec: FileCodec) -> Self {
        Self {
            codec,
            source: None,
            preset: Some(presets::default_preset()),
            instructions: String::new(),
            result: None,
            status: GenerationStatus::Idle,
            error: None,
            ticket: 0,
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn preset(&self) -> Option<&'static StylePreset> {
        self.preset
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    /// Last error message, cleared by the next successful action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the Generate trigger should be offered.
    pub fn can_generate(&self) -> bool {
        self.source.is_some() && self.status != GenerationStatus::Loading
    }

    /// Validates and encodes a newly selected file.
    ///
    /// On success the previous source and result are replaced, the status
    /// returns to `Idle` and any outstanding request is orphaned. On failure
    /// only the error message changes.
    pub fn acquire(&mut self, file: SelectedFile) -> Result<()> {
        let name = file.name.clone();
        match self.codec.load(file) {
            Ok(source) => {
                tracing::info!(
                    file = %name,
                    media_type = %source.media_type(),
                    payload_len = source.payload.data.len(),
                    "Source image acquired"
                );
                self.source = Some(source);
                self.result = None;
                self.error = None;
                self.status = GenerationStatus::Idle;
                self.ticket += 1;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Rejected source image");
                Err(self.record(e))
            }
        }
    }

    /// Selects a style by id, or clears the selection with `None`.
    ///
    /// Free-text instructions are left untouched.
    pub fn select_preset(&mut self, id: Option<&str>) -> Result<()> {
        self.preset = match id {
            Some(id) => Some(presets::find(id).ok_or_else(|| AppError::UnknownPreset(id.to_string()))?),
            None => None,
        };
        Ok(())
    }

    pub fn set_instructions(&mut self, text: impl Into<String>) {
        self.instructions = text.into();
    }

    /// Mutable access for text widgets bound directly to the instructions.
    pub fn instructions_mut(&mut self) -> &mut String {
        &mut self.instructions
    }

    /// Validates the session and moves to `Loading`.
    ///
    /// Returns the request to hand to an [`ImageGenerator`]. When rejected,
    /// the status is unchanged and the validation message is recorded.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest> {
        let checked = match &self.source {
            None => Err(AppError::NoSourceImage),
            Some(_) if self.preset.is_none() && self.instructions.trim().is_empty() => {
                Err(AppError::MissingInstructions)
            }
            Some(source) => Ok(source.payload.clone()),
        };
        let payload = checked.map_err(|e| self.record(e))?;

        let request = GenerationRequest {
            ticket: self.ticket,
            payload: payload.data,
            media_type: payload.media_type,
            instructions: compose_instructions(self.preset, &self.instructions),
        };

        self.status = GenerationStatus::Loading;
        self.error = None;
        tracing::info!(
            ticket = request.ticket,
            preset = self.preset.map(|p| p.id).unwrap_or("none"),
            "Generation started"
        );
        Ok(request)
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Outcomes for an orphaned request, or arriving when nothing is
    /// loading, are dropped. A failure keeps the previous result and is
    /// returned after its message has been recorded.
    pub fn finish_generation(&mut self, ticket: u64, outcome: Result<String>) -> Result<()> {
        if self.status != GenerationStatus::Loading || ticket != self.ticket {
            tracing::debug!(ticket, current = self.ticket, "Dropping stale generation outcome");
            return Ok(());
        }

        match outcome {
            Ok(payload) => {
                tracing::info!(ticket, payload_len = payload.len(), "Generation succeeded");
                self.result = Some(GenerationResult(payload));
                self.status = GenerationStatus::Success;
                Ok(())
            }
            Err(e) => {
                tracing::error!(ticket, error = %e, "Generation failed");
                self.status = GenerationStatus::Error;
                Err(self.record(e))
            }
        }
    }

    /// Runs one full generation against `generator`.
    pub async fn generate<G>(&mut self, generator: &G) -> Result<()>
    where
        G: ImageGenerator + ?Sized,
    {
        let request = self.begin_generation()?;
        let outcome = generator.edit_image(&request).await;
        self.finish_generation(request.ticket, outcome)
    }

    /// "Generate Another": drops the result, keeps source and style.
    pub fn reset_result(&mut self) {
        self.result = None;
        if self.status != GenerationStatus::Loading {
            self.status = GenerationStatus::Idle;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Saves the current result into `dir`.
    ///
    /// Returns `Ok(None)` without touching the filesystem when there is no
    /// result.
    pub fn download(&self, dir: &Path) -> Result<Option<PathBuf>> {
        self.download_at(dir, Utc::now())
    }

    fn download_at(&self, dir: &Path, now: DateTime<Utc>) -> Result<Option<PathBuf>> {
        let Some(result) = &self.result else {
            return Ok(None);
        };

        let bytes = file_codec::decode_payload(result.payload())?;
        fs::create_dir_all(dir)?;
        let path = dir.join(download_file_name(now));
        fs::write(&path, bytes)?;

        tracing::info!(path = %path.display(), "Saved generated image");
        Ok(Some(path))
    }

    fn record(&mut self, err: AppError) -> AppError {
        self.error = Some(err.user_message());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_codec::tests::png_bytes;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn png_file(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, None, Arc::from(png_bytes(2, 2)))
    }

    fn loaded_session() -> Session {
        let mut session = Session::default();
        session.acquire(png_file("photo.png")).unwrap();
        session
    }

    #[test]
    fn starts_idle_with_first_style() {
        let session = Session::default();
        assert_eq!(session.status(), GenerationStatus::Idle);
        assert_eq!(session.preset().map(|p| p.id), Some("corporate"));
        assert!(!session.can_generate());
    }

    #[test]
    fn unknown_style_is_rejected_and_selection_kept() {
        let mut session = Session::default();
        assert!(matches!(
            session.select_preset(Some("vaporwave")),
            Err(AppError::UnknownPreset(_))
        ));
        assert_eq!(session.preset().map(|p| p.id), Some("corporate"));
    }

    #[test]
    fn selecting_style_keeps_instructions() {
        let mut session = Session::default();
        session.set_instructions("Remove glasses");
        session.select_preset(Some("startup")).unwrap();
        assert_eq!(session.instructions(), "Remove glasses");
    }

    #[test]
    fn begin_moves_to_loading_and_clears_error() {
        let mut session = loaded_session();
        session.select_preset(None).unwrap();
        assert!(session.begin_generation().is_err());
        assert!(session.error().is_some());

        session.set_instructions("Make the background darker");
        let request = session.begin_generation().unwrap();

        assert_eq!(session.status(), GenerationStatus::Loading);
        assert!(session.error().is_none());
        assert!(!session.can_generate());
        assert_eq!(request.media_type, "image/png");
        assert_eq!(
            request.instructions,
            " Additional instructions: Make the background darker"
        );
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut session = loaded_session();
        let request = session.begin_generation().unwrap();

        session.acquire(png_file("second.png")).unwrap();
        session
            .finish_generation(request.ticket, Ok("Zm9v".to_string()))
            .unwrap();

        assert_eq!(session.status(), GenerationStatus::Idle);
        assert!(session.result().is_none());
    }

    #[test]
    fn outcome_without_loading_is_ignored() {
        let mut session = loaded_session();
        session.finish_generation(1, Ok("Zm9v".to_string())).unwrap();
        assert!(session.result().is_none());
    }

    #[test]
    fn reset_keeps_source_and_style() {
        let mut session = loaded_session();
        let request = session.begin_generation().unwrap();
        session
            .finish_generation(request.ticket, Ok("Zm9v".to_string()))
            .unwrap();

        session.reset_result();

        assert!(session.result().is_none());
        assert!(session.source().is_some());
        assert_eq!(session.preset().map(|p| p.id), Some("corporate"));
        assert_eq!(session.status(), GenerationStatus::Idle);
    }

    #[test]
    fn download_writes_decoded_bytes_with_timestamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session();
        let request = session.begin_generation().unwrap();
        session
            .finish_generation(request.ticket, Ok("Zm9v".to_string()))
            .unwrap();

        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let path = session.download_at(dir.path(), now).unwrap().unwrap();

        assert_eq!(path.file_name().unwrap(), "proshot-ai-1700000000123.png");
        assert_eq!(fs::read(path).unwrap(), b"foo");
    }
}
