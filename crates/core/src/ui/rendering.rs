//! UI rendering helpers.
//!
//! Texture conversion, image placement and the overlays drawn over the
//! upload zone and the result panel.

use eframe::egui;
use image::DynamicImage;

/// Converts a decoded image into egui's texture format.
pub fn color_image_from(image: &DynamicImage) -> egui::ColorImage {
    let image_buffer = image.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image_buffer.as_flat_samples();
    egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice())
}

/// Largest rectangle with the image's aspect ratio that fits in `bounds`,
/// centered.
pub fn fit_within(image_size: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return egui::Rect::from_center_size(bounds.center(), egui::Vec2::ZERO);
    }
    let scale = (bounds.width() / image_size.x).min(bounds.height() / image_size.y);
    egui::Rect::from_center_size(bounds.center(), image_size * scale)
}

/// UV rectangle that crops the image to fill `target_size` without
/// distortion.
pub fn cover_uv(image_size: egui::Vec2, target_size: egui::Vec2) -> egui::Rect {
    let full = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    if image_size.x <= 0.0 || image_size.y <= 0.0 || target_size.x <= 0.0 || target_size.y <= 0.0 {
        return full;
    }

    let image_aspect = image_size.x / image_size.y;
    let target_aspect = target_size.x / target_size.y;

    if image_aspect > target_aspect {
        // Image is wider: trim left and right
        let visible = target_aspect / image_aspect;
        let margin = (1.0 - visible) / 2.0;
        egui::Rect::from_min_max(egui::pos2(margin, 0.0), egui::pos2(1.0 - margin, 1.0))
    } else {
        // Image is taller: trim top and bottom
        let visible = image_aspect / target_aspect;
        let margin = (1.0 - visible) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, margin), egui::pos2(1.0, 1.0 - margin))
    }
}

/// Paints a texture into `rect` using the given UV crop.
pub fn paint_texture(painter: &egui::Painter, texture: &egui::TextureHandle, rect: egui::Rect, uv: egui::Rect) {
    painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
}

/// Dims `rect` and writes a centered caption over it.
///
/// # Arguments
/// * `painter` - The egui painter to draw with
/// * `rect` - Area to cover
/// * `alpha` - Darkness level (0-255, higher = darker)
/// * `caption` - Text drawn in the middle
pub fn draw_caption_overlay(painter: &egui::Painter, rect: egui::Rect, alpha: u8, caption: &str) {
    painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(alpha));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        caption,
        egui::FontId::proportional(16.0),
        egui::Color32::WHITE,
    );
}

/// Draws the drop zone frame, highlighted while files hover over it.
pub fn draw_zone_border(painter: &egui::Painter, rect: egui::Rect, highlighted: bool) {
    let (width, color) = if highlighted {
        (3.0, egui::Color32::from_rgb(79, 70, 229))
    } else {
        (1.5, egui::Color32::from_gray(170))
    };
    painter.rect_stroke(
        rect,
        12.0,
        egui::Stroke::new(width, color),
        egui::StrokeKind::Middle,
    );
}
