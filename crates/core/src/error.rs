//! Error types for the proshot-core library.
//!
//! Every failure is caught where it originates and turned into a plain
//! message through [`AppError::user_message`]; nothing reaches the user as
//! a raw technical fault.

use thiserror::Error;

/// Fallback text for a failed generation that carries no message of its own.
pub const GENERIC_GENERATION_FAILURE: &str = "Something went wrong during generation.";

/// Errors that can occur within the proshot-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing keys, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required environment variable was not found.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// The selected file does not carry an image media type.
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    /// The selected file exceeds the upload limit.
    #[error("File is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    /// The file could not be read or decoded.
    #[error("Failed to read image file: {0}")]
    FileRead(String),

    /// Generation was requested before any image was acquired.
    #[error("No source image has been uploaded")]
    NoSourceImage,

    /// Generation was requested with neither a style nor instructions.
    #[error("Neither a style nor instructions were given")]
    MissingInstructions,

    /// A style identifier that is not part of the catalogue.
    #[error("Unknown style: {0}")]
    UnknownPreset(String),

    /// General Gemini API error.
    #[error("Gemini API error: {0}")]
    GeminiApi(String),

    /// Rate limited by the Gemini API.
    #[error("Rate limited by Gemini API, please retry later")]
    RateLimited,

    /// The response held no inline image.
    #[error("No image data found in the response.")]
    NoImageData,

    /// UI-related errors (rendering, window management).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a file read error with the given message.
    pub fn file_read(msg: impl Into<String>) -> Self {
        Self::FileRead(msg.into())
    }

    /// Creates a Gemini API error with the given message.
    pub fn gemini(msg: impl Into<String>) -> Self {
        Self::GeminiApi(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }

    /// Returns the banner text shown to the user for this error.
    ///
    /// Local validation failures map to fixed sentences. Remote failures keep
    /// their own message and fall back to [`GENERIC_GENERATION_FAILURE`] when
    /// they have none.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFileType(_) => "Invalid file type. Please upload an image.".to_string(),
            Self::FileTooLarge { limit, .. } => format!(
                "Image is too large. Please upload a file up to {} MB.",
                limit.div_ceil(1024 * 1024)
            ),
            Self::FileRead(_) | Self::Io(_) => "Failed to process image file.".to_string(),
            Self::NoSourceImage => "Please upload an image first.".to_string(),
            Self::MissingInstructions => "Please select a style or enter a prompt.".to_string(),
            Self::NoImageData => self.to_string(),
            Self::GeminiApi(msg) if msg.trim().is_empty() => GENERIC_GENERATION_FAILURE.to_string(),
            Self::GeminiApi(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_use_fixed_sentences() {
        assert_eq!(
            AppError::InvalidFileType("application/pdf".into()).user_message(),
            "Invalid file type. Please upload an image."
        );
        assert_eq!(
            AppError::MissingInstructions.user_message(),
            "Please select a style or enter a prompt."
        );
        assert_eq!(
            AppError::file_read("truncated").user_message(),
            "Failed to process image file."
        );
    }

    #[test]
    fn too_large_reports_limit_in_megabytes() {
        let err = AppError::FileTooLarge {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        assert_eq!(
            err.user_message(),
            "Image is too large. Please upload a file up to 5 MB."
        );
    }

    #[test]
    fn remote_failures_keep_their_message_or_fall_back() {
        assert_eq!(AppError::gemini("quota exceeded").user_message(), "quota exceeded");
        assert_eq!(AppError::gemini("  ").user_message(), GENERIC_GENERATION_FAILURE);
        assert_eq!(
            AppError::NoImageData.user_message(),
            "No image data found in the response."
        );
    }
}
