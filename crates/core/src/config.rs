use std::env;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::file_codec::DEFAULT_MAX_UPLOAD_BYTES;
use directories::UserDirs;
use dotenvy::dotenv;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    pub model_name: String,
    /// Upload cap in bytes.
    pub max_upload_bytes: u64,
    /// Where downloaded results are written.
    pub output_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model_name = lookup("GEMINI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_upload_bytes = match lookup("PROSHOT_MAX_UPLOAD_MB") {
            Some(raw) => parse_megabytes(&raw)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let output_dir = lookup("PROSHOT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_output_dir);

        Ok(Self {
            gemini_api_key: api_key,
            model_name,
            max_upload_bytes,
            output_dir,
        })
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

fn parse_megabytes(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(mb) if mb > 0 => Ok(mb * 1024 * 1024),
        _ => Err(AppError::config(format!(
            "PROSHOT_MAX_UPLOAD_MB must be a positive integer, got {raw:?}"
        ))),
    }
}

/// The user's Downloads directory, or the working directory when unknown.
pub fn default_output_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Builds a [`Config`] without touching the environment.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    model: Option<String>,
    max_upload_bytes: Option<u64>,
    output_dir: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = Some(bytes);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<Config> {
        let gemini_api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::config("An API key is required"))?;

        Ok(Config {
            gemini_api_key,
            model_name: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_upload_bytes: self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            output_dir: self.output_dir.unwrap_or_else(default_output_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::MissingEnvVar(ref name) if name == "GEMINI_API_KEY"));
    }

    #[test]
    fn falls_back_to_api_key_and_defaults() {
        let config = Config::from_lookup(lookup_from(&[("API_KEY", "abc")])).unwrap();
        assert_eq!(config.gemini_api_key, "abc");
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("GEMINI_MODEL", "gemini-3-pro-image-preview"),
            ("PROSHOT_MAX_UPLOAD_MB", "10"),
            ("PROSHOT_OUTPUT_DIR", "/tmp/shots"),
        ]))
        .unwrap();
        assert_eq!(config.model_name, "gemini-3-pro-image-preview");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/shots"));
    }

    #[test]
    fn rejects_bad_upload_limit() {
        for raw in ["0", "-3", "five"] {
            let result = Config::from_lookup(lookup_from(&[
                ("GEMINI_API_KEY", "key"),
                ("PROSHOT_MAX_UPLOAD_MB", raw),
            ]));
            assert!(matches!(result, Err(AppError::Config(_))), "accepted {raw}");
        }
    }

    #[test]
    fn builder_requires_key() {
        assert!(Config::builder().with_model("m").build().is_err());

        let config = Config::builder()
            .with_api_key("key")
            .with_output_dir("/out")
            .build()
            .unwrap();
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.output_dir, PathBuf::from("/out"));
    }
}
