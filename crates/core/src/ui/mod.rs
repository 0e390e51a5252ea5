//! User interface components for proshot.
//!
//! The window mirrors the session lifecycle in three columns of work:
//! upload, customize & generate, results.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: Messages from background generation threads
//! - [`rendering`]: Texture conversion, image placement and overlays
//! - [`upload_zone`]: Drag-and-drop and file picker adapters
//! - [`style_selector`]: Style cards
//! - [`headshot_app`]: Main application logic
//!
//! # Usage
//!
//! ```ignore
//! use proshot_core::{ui, Config};
//!
//! let config = Config::load()?;
//! ui::run_app(config)?;
//! ```

mod headshot_app;
mod rendering;
mod state;
mod style_selector;
mod upload_zone;

// Public API exports
pub use headshot_app::HeadshotApp;

use crate::config::Config;
use crate::error::Result;

/// Opens the headshot window and returns when the user closes it.
///
/// # Arguments
/// * `config` - Application configuration with API key, model and limits
pub fn run_app(config: Config) -> Result<()> {
    headshot_app::run(config)
}
