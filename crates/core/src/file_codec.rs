//! File validation and encoding utilities.
//!
//! This module turns a file the user picked or dropped into a
//! [`SourceImage`]: the media type is checked, the size is capped, the bytes
//! are encoded to Base64 for transmission to the Gemini API, and a
//! downscaled preview is decoded for display when the format allows it.
//!
//! The reverse direction is also here: [`decode_payload`] turns a generated
//! result back into bytes for saving, and [`data_url`] builds the
//! `data:` URL form of a payload.

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default upload cap (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Longest edge of the decoded preview, in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 1024;

const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Where the bytes of a [`SelectedFile`] live.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// A file on disk (file picker, native drops).
    Path(PathBuf),
    /// Bytes already in memory (drops that carry no path).
    Bytes(Arc<[u8]>),
}

/// A file handed over by the user, not yet validated.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub content: FileContent,
}

impl SelectedFile {
    /// Wraps a path, guessing the media type from its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            media_type: media_type_for(&path),
            content: FileContent::Path(path),
        }
    }

    /// Wraps in-memory bytes. A non-empty `media_type` wins over the name.
    pub fn from_bytes(name: impl Into<String>, media_type: Option<&str>, bytes: Arc<[u8]>) -> Self {
        let name = name.into();
        let media_type = media_type
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| media_type_for(Path::new(&name)));

        Self {
            name,
            media_type,
            content: FileContent::Bytes(bytes),
        }
    }

    /// Size in bytes, if it can be determined without reading the file.
    fn size_hint(&self) -> Option<u64> {
        match &self.content {
            FileContent::Path(path) => fs::metadata(path).ok().map(|m| m.len()),
            FileContent::Bytes(bytes) => Some(bytes.len() as u64),
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match &self.content {
            FileContent::Path(path) => fs::read(path)
                .map_err(|e| AppError::file_read(format!("{}: {}", path.display(), e))),
            FileContent::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Guesses a media type from a file name's extension.
pub fn media_type_for(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MEDIA_TYPE.to_string())
}

/// A transport-ready Base64 payload plus the media type it was read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub data: String,
    pub media_type: String,
}

/// A validated, encoded upload. Replaced wholesale on re-upload.
#[derive(Clone)]
pub struct SourceImage {
    pub file: SelectedFile,
    /// `None` when the bytes are an image type we cannot decode locally.
    pub preview: Option<DynamicImage>,
    pub payload: EncodedPayload,
}

impl SourceImage {
    pub fn media_type(&self) -> &str {
        &self.payload.media_type
    }
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("name", &self.file.name)
            .field("media_type", &self.payload.media_type)
            .field("preview", &self.preview.as_ref().map(|p| (p.width(), p.height())))
            .field("payload_len", &self.payload.data.len())
            .finish()
    }
}

/// Validation and encoding of user files.
#[derive(Debug, Clone, Copy)]
pub struct FileCodec {
    max_upload_bytes: Option<u64>,
}

impl Default for FileCodec {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_UPLOAD_BYTES))
    }
}

impl FileCodec {
    /// `None` disables the size cap.
    pub fn new(max_upload_bytes: Option<u64>) -> Self {
        Self { max_upload_bytes }
    }

    /// Accepts only image media types.
    pub fn validate(file: &SelectedFile) -> bool {
        file.media_type.starts_with("image/")
    }

    /// Reads the file and encodes it to Base64, keeping its media type.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::FileTooLarge`] over the cap and
    /// [`AppError::FileRead`] when the bytes cannot be read.
    pub fn encode(&self, file: &SelectedFile) -> Result<EncodedPayload> {
        self.encode_bytes(file).map(|(payload, _)| payload)
    }

    /// Validates, encodes and decodes a preview in one step.
    ///
    /// The payload is sent as-is, so an image type without a local decoder
    /// still loads, just without a preview.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFileType`] for non-image media types, plus
    /// everything [`FileCodec::encode`] returns.
    pub fn load(&self, file: SelectedFile) -> Result<SourceImage> {
        if !Self::validate(&file) {
            return Err(AppError::InvalidFileType(file.media_type.clone()));
        }

        let (payload, bytes) = self.encode_bytes(&file)?;
        let preview = match decode_preview(&bytes) {
            Ok(preview) => Some(preview),
            Err(e) => {
                tracing::warn!(file = %file.name, media_type = %file.media_type, error = %e, "No preview for upload");
                None
            }
        };

        Ok(SourceImage {
            file,
            preview,
            payload,
        })
    }

    fn encode_bytes(&self, file: &SelectedFile) -> Result<(EncodedPayload, Vec<u8>)> {
        if let (Some(limit), Some(size)) = (self.max_upload_bytes, file.size_hint()) {
            if size > limit {
                return Err(AppError::FileTooLarge { size, limit });
            }
        }

        let bytes = file.read()?;
        if let Some(limit) = self.max_upload_bytes {
            let size = bytes.len() as u64;
            if size > limit {
                return Err(AppError::FileTooLarge { size, limit });
            }
        }

        let payload = EncodedPayload {
            data: BASE64.encode(&bytes),
            media_type: file.media_type.clone(),
        };
        Ok((payload, bytes))
    }
}

/// Decodes image bytes, downscaled to [`PREVIEW_MAX_EDGE`].
fn decode_preview(bytes: &[u8]) -> image::ImageResult<DynamicImage> {
    let decoded = image::load_from_memory(bytes)?;
    if decoded.width() > PREVIEW_MAX_EDGE || decoded.height() > PREVIEW_MAX_EDGE {
        Ok(decoded.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE))
    } else {
        Ok(decoded)
    }
}

/// Decodes a Base64 payload back into raw bytes.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(payload.trim())
        .map_err(|e| AppError::file_read(format!("Invalid Base64 payload: {}", e)))
}

/// Builds a `data:` URL for a payload.
pub fn data_url(media_type: &str, payload: &str) -> String {
    format!("data:{};base64,{}", media_type, payload)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use std::io::Cursor;

    /// Encodes a small solid PNG.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgba([200, 120, 40, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(buffer)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn media_type_comes_from_extension() {
        assert_eq!(media_type_for(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("PHOTO.PNG")), "image/png");
        assert_eq!(media_type_for(Path::new("document.pdf")), UNKNOWN_MEDIA_TYPE);
        assert_eq!(media_type_for(Path::new("no_extension")), UNKNOWN_MEDIA_TYPE);
    }

    #[test]
    fn validate_rejects_non_images() {
        let pdf = SelectedFile::from_path("document.pdf");
        let text = SelectedFile::from_bytes("notes", Some("text/plain"), Arc::from(&b"hi"[..]));
        let jpeg = SelectedFile::from_path("photo.jpg");

        assert!(!FileCodec::validate(&pdf));
        assert!(!FileCodec::validate(&text));
        assert!(FileCodec::validate(&jpeg));
    }

    #[test]
    fn dropped_mime_wins_over_name() {
        let file = SelectedFile::from_bytes("blob", Some("image/webp"), Arc::from(&b""[..]));
        assert_eq!(file.media_type, "image/webp");

        let guessed = SelectedFile::from_bytes("selfie.png", Some(""), Arc::from(&b""[..]));
        assert_eq!(guessed.media_type, "image/png");
    }

    #[test]
    fn encode_keeps_media_type_and_roundtrips() {
        let bytes = png_bytes(4, 4);
        let file = SelectedFile::from_bytes("a.png", None, Arc::from(bytes.clone()));

        let payload = FileCodec::default().encode(&file).unwrap();
        assert_eq!(payload.media_type, "image/png");
        assert_eq!(decode_payload(&payload.data).unwrap(), bytes);
    }

    #[test]
    fn load_enforces_size_cap() {
        let bytes = png_bytes(16, 16);
        let limit = bytes.len() as u64 - 1;
        let file = SelectedFile::from_bytes("a.png", None, Arc::from(bytes));

        let err = FileCodec::new(Some(limit)).load(file.clone()).unwrap_err();
        assert!(matches!(err, AppError::FileTooLarge { limit: l, .. } if l == limit));

        assert!(FileCodec::new(None).load(file).is_ok());
    }

    #[test]
    fn load_accepts_gif() {
        let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(buffer)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Gif)
            .unwrap();
        let file = SelectedFile::from_bytes("anim.gif", Some("image/gif"), Arc::from(bytes.clone()));

        let source = FileCodec::default().load(file).unwrap();

        assert_eq!(source.media_type(), "image/gif");
        assert_eq!(decode_payload(&source.payload.data).unwrap(), bytes);
        assert!(source.preview.is_some());
    }

    #[test]
    fn undecodable_image_loads_without_preview() {
        let bytes = b"\0\0\0\x18ftypheic";
        let file = SelectedFile::from_bytes("IMG_0001.HEIC", Some("image/heic"), Arc::from(&bytes[..]));

        let source = FileCodec::default().load(file).unwrap();

        assert_eq!(source.media_type(), "image/heic");
        assert!(source.preview.is_none());
        assert_eq!(decode_payload(&source.payload.data).unwrap(), bytes);
    }

    #[test]
    fn load_missing_path_is_read_error() {
        let file = SelectedFile::from_path("/definitely/not/here.jpg");
        let err = FileCodec::default().load(file).unwrap_err();
        assert!(matches!(err, AppError::FileRead(_)));
    }

    #[test]
    fn preview_is_downscaled() {
        let bytes = png_bytes(PREVIEW_MAX_EDGE * 2, 10);
        let file = SelectedFile::from_bytes("wide.png", None, Arc::from(bytes));
        let source = FileCodec::new(None).load(file).unwrap();
        assert!(source.preview.unwrap().width() <= PREVIEW_MAX_EDGE);
    }

    #[test]
    fn data_url_format() {
        assert_eq!(data_url("image/png", "Zm9v"), "data:image/png;base64,Zm9v");
    }
}
