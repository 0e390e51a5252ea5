//! The fixed catalogue of headshot styles.

use serde::Serialize;

/// A named instruction template steering the generated style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StylePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub prompt_fragment: &'static str,
    pub icon: &'static str,
}

/// All styles, in display order.
pub const PRESETS: &[StylePreset] = &[
    StylePreset {
        id: "corporate",
        name: "Corporate Professional",
        description: "Grey gradient backdrop, soft studio lighting, business attire.",
        prompt_fragment: "Generate a high-quality professional headshot. The subject should be wearing business professional attire. The background is a clean, neutral grey studio backdrop with soft, flattering lighting. High resolution, photorealistic.",
        icon: "🏢",
    },
    StylePreset {
        id: "startup",
        name: "Modern Startup",
        description: "Blurred modern office background, smart casual look.",
        prompt_fragment: "Create a modern, approachable headshot suitable for a tech startup. The subject should wear smart casual clothing. The background is a bright, blurred modern open-plan office with glass and greenery. Natural lighting.",
        icon: "🚀",
    },
    StylePreset {
        id: "outdoor",
        name: "Natural Outdoor",
        description: "Golden hour lighting, nature bokeh background.",
        prompt_fragment: "Generate a warm, natural headshot taken outdoors. The background is a soft bokeh of trees or a park during golden hour. The lighting is warm and sun-kissed. The subject appears relaxed and friendly.",
        icon: "🌳",
    },
    StylePreset {
        id: "studio-bw",
        name: "Studio B&W",
        description: "High contrast, artistic black and white portrait.",
        prompt_fragment: "Create an artistic black and white studio headshot. High contrast lighting, dramatic shadows, sharp focus on the eyes. Plain black or dark grey background. Classic and timeless style.",
        icon: "📸",
    },
    StylePreset {
        id: "cyberpunk",
        name: "Neon/Creative",
        description: "Vibrant colors, neon lights, creative edge.",
        prompt_fragment: "Generate a creative headshot with a cyberpunk aesthetic. Neon lighting in blue and pink hues illuminating the subject. Dark background with bokeh city lights. stylized and bold.",
        icon: "🌃",
    },
];

/// Looks up a style by identifier.
pub fn find(id: &str) -> Option<&'static StylePreset> {
    PRESETS.iter().find(|preset| preset.id == id)
}

/// The style selected when a session starts.
pub fn default_preset() -> &'static StylePreset {
    &PRESETS[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_is_well_formed() {
        let ids: HashSet<_> = PRESETS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), PRESETS.len(), "duplicate style ids");
        assert!(PRESETS.iter().all(|p| !p.prompt_fragment.trim().is_empty()));
    }

    #[test]
    fn find_by_id() {
        assert_eq!(find("studio-bw").map(|p| p.name), Some("Studio B&W"));
        assert!(find("Corporate").is_none());
        assert_eq!(default_preset().id, "corporate");
    }
}
