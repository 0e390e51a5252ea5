//! ProShot Core Library
//!
//! This library turns a casual photo into a professional headshot by sending
//! it, together with a style description, to Google's Gemini image model.
//!
//! # Overview
//!
//! One photo goes through one lifecycle: it is uploaded, a style and
//! optional instructions are chosen, a single generation request is made,
//! and the result can be saved or discarded. The library handles:
//!
//! - **File Handling**: Validation, size cap and Base64 encoding via [`file_codec`]
//! - **Styles**: The fixed style catalogue in [`presets`]
//! - **Lifecycle**: The session state machine in [`session`]
//! - **AI Integration**: Gemini image editing via [`gemini`]
//! - **User Interface**: The desktop window via [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use proshot_core::{ProShot, SelectedFile};
//!
//! let app = ProShot::new()?;
//! let client = app.client()?;
//! let mut session = app.session();
//!
//! session.acquire(SelectedFile::from_path("selfie.jpg"))?;
//! session.select_preset(Some("corporate"))?;
//! session.generate(&client).await?;
//! session.download(&app.config().output_dir)?;
//! ```
//!
//! # Module Structure
//!
//! - [`acquisition`]: Drag-and-drop / picker normalization
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`file_codec`]: File validation and encoding
//! - [`gemini`]: Gemini image editing client
//! - [`generation`]: Request composition and the generator trait
//! - [`presets`]: Style catalogue
//! - [`session`]: Lifecycle state machine
//! - [`ui`]: User interface components

pub mod acquisition;
pub mod config;
pub mod error;
pub mod file_codec;
pub mod gemini;
pub mod generation;
pub mod presets;
pub mod session;
pub mod ui;

// Re-export primary types for convenience
pub use config::Config;
pub use error::{AppError, Result};
pub use file_codec::{FileCodec, SelectedFile};
pub use gemini::GeminiClient;
pub use generation::ImageGenerator;
pub use presets::StylePreset;
pub use session::{GenerationStatus, Session};

/// Main entry point for the ProShot application.
///
/// This struct provides a facade over configuration, the Gemini client and
/// the session, and launches the window.
pub struct ProShot {
    config: Config,
}

impl ProShot {
    /// Creates a new instance with configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or a setting is invalid.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
        })
    }

    /// Creates an instance with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Starts a fresh session using the configured upload limit.
    pub fn session(&self) -> Session {
        Session::new(FileCodec::new(Some(self.config.max_upload_bytes)))
    }

    /// Builds a Gemini client for the configured model.
    pub fn client(&self) -> Result<GeminiClient> {
        GeminiClient::new(&self.config)
    }

    /// Opens the headshot window and blocks until it is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or UI initialization fails.
    pub fn run_interactive(&self) -> Result<()> {
        ui::run_app(self.config.clone())
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup before using any other functions.
/// This loads `.env` files if present.
pub fn init() {
    let _ = dotenvy::dotenv();
}
