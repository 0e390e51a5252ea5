//! Request composition and the seam to the image generation service.

use crate::error::Result;
use crate::presets::StylePreset;
use async_trait::async_trait;

/// Phrase that introduces free-text instructions after a style fragment.
pub const SUPPLEMENTARY_PREFIX: &str = " Additional instructions: ";

/// Everything one generation call carries. Built fresh per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Identifies the attempt so stale completions can be dropped.
    pub ticket: u64,
    pub payload: String,
    pub media_type: String,
    pub instructions: String,
}

/// Something that edits an image according to instructions.
///
/// Implementations send exactly one image and one text part per call and
/// return the Base64 payload of the produced image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn edit_image(&self, request: &GenerationRequest) -> Result<String>;
}

/// Joins the style fragment and the user's own instructions.
///
/// The fragment comes first, verbatim. Non-blank free text follows, trimmed
/// and introduced by [`SUPPLEMENTARY_PREFIX`].
pub fn compose_instructions(preset: Option<&StylePreset>, custom: &str) -> String {
    let mut instructions = preset
        .map(|p| p.prompt_fragment.to_string())
        .unwrap_or_default();

    let custom = custom.trim();
    if !custom.is_empty() {
        instructions.push_str(SUPPLEMENTARY_PREFIX);
        instructions.push_str(custom);
    }

    instructions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    #[test]
    fn preset_only_is_verbatim() {
        let corporate = presets::find("corporate").unwrap();
        assert_eq!(
            compose_instructions(Some(corporate), "  \n"),
            corporate.prompt_fragment
        );
    }

    #[test]
    fn text_only_appends_to_empty_fragment() {
        assert_eq!(
            compose_instructions(None, "  Remove glasses "),
            " Additional instructions: Remove glasses"
        );
    }

    #[test]
    fn fragment_precedes_supplementary_text() {
        let outdoor = presets::find("outdoor").unwrap();
        let composed = compose_instructions(Some(outdoor), "Make me smile slightly");

        assert!(composed.starts_with(outdoor.prompt_fragment));
        assert!(composed.ends_with(" Additional instructions: Make me smile slightly"));
    }
}
