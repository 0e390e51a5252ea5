//! The upload zone: drag-and-drop and file picker adapters.
//!
//! Both inputs are reduced to a [`FileAcquired`] event; whether the file is
//! usable is decided by the session.

use super::rendering::{color_image_from, cover_uv, draw_caption_overlay, draw_zone_border, paint_texture};
use crate::acquisition::{self, DropTarget, FileAcquired};
use crate::file_codec::{SelectedFile, SourceImage};
use eframe::egui;

/// Extensions offered by the file dialog.
const PICKER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub(crate) struct UploadZone {
    target: DropTarget,
    preview_texture: Option<egui::TextureHandle>,
    size_hint: String,
}

impl UploadZone {
    pub fn new(max_upload_bytes: u64) -> Self {
        Self {
            target: DropTarget::default(),
            preview_texture: None,
            size_hint: format!(
                "JPG, PNG, WEBP up to {} MB",
                max_upload_bytes.div_ceil(1024 * 1024)
            ),
        }
    }

    /// Forgets the uploaded texture so the next frame rebuilds it.
    pub fn invalidate_preview(&mut self) {
        self.preview_texture = None;
    }

    /// Reads window-level drag state and dropped files for this frame.
    pub fn collect_drops(&mut self, ctx: &egui::Context) -> Option<FileAcquired> {
        let (hovering, dropped) = ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));

        if dropped.is_empty() {
            self.target.set_hovering(hovering);
            return None;
        }

        tracing::debug!(count = dropped.len(), "Files dropped on window");
        self.target
            .drop_files(dropped.iter().filter_map(selected_file_from_drop))
    }

    /// Draws the zone and opens the file dialog when it is clicked.
    pub fn show(&mut self, ui: &mut egui::Ui, source: Option<&SourceImage>) -> Option<FileAcquired> {
        let width = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(egui::vec2(width, width), egui::Sense::click());
        let painter = ui.painter_at(rect);

        match source {
            Some(SourceImage { preview: Some(image), .. }) => {
                let texture = self.preview_texture.get_or_insert_with(|| {
                    ui.ctx()
                        .load_texture("source-preview", color_image_from(image), egui::TextureOptions::LINEAR)
                });
                let uv = cover_uv(texture.size_vec2(), rect.size());
                paint_texture(&painter, texture, rect, uv);

                if response.hovered() || self.target.is_hovering() {
                    draw_caption_overlay(&painter, rect, 110, "⟳  Change Image");
                }
            }
            Some(SourceImage { file, .. }) => {
                painter.rect_filled(rect, 12.0, egui::Color32::from_gray(235));
                painter.text(
                    rect.center() - egui::vec2(0.0, 12.0),
                    egui::Align2::CENTER_CENTER,
                    &file.name,
                    egui::FontId::proportional(16.0),
                    egui::Color32::from_gray(60),
                );
                painter.text(
                    rect.center() + egui::vec2(0.0, 14.0),
                    egui::Align2::CENTER_CENTER,
                    "Preview not available",
                    egui::FontId::proportional(13.0),
                    egui::Color32::from_gray(120),
                );

                if response.hovered() || self.target.is_hovering() {
                    draw_caption_overlay(&painter, rect, 110, "⟳  Change Image");
                }
            }
            None => {
                let fill = if self.target.is_hovering() {
                    egui::Color32::from_rgb(238, 242, 255)
                } else {
                    egui::Color32::from_gray(245)
                };
                painter.rect_filled(rect, 12.0, fill);
                painter.text(
                    rect.center() - egui::vec2(0.0, 24.0),
                    egui::Align2::CENTER_CENTER,
                    "Upload a Selfie",
                    egui::FontId::proportional(20.0),
                    egui::Color32::from_gray(60),
                );
                painter.text(
                    rect.center() + egui::vec2(0.0, 4.0),
                    egui::Align2::CENTER_CENTER,
                    "Drag & drop or click to browse",
                    egui::FontId::proportional(14.0),
                    egui::Color32::from_gray(110),
                );
                painter.text(
                    rect.center() + egui::vec2(0.0, 36.0),
                    egui::Align2::CENTER_CENTER,
                    &self.size_hint,
                    egui::FontId::proportional(12.0),
                    egui::Color32::from_gray(150),
                );
            }
        }

        draw_zone_border(&painter, rect.shrink(1.0), self.target.is_hovering());

        if response.clicked() {
            let path = rfd::FileDialog::new()
                .add_filter("Images", PICKER_EXTENSIONS)
                .pick_file();
            return acquisition::picked(path);
        }

        None
    }
}

fn selected_file_from_drop(file: &egui::DroppedFile) -> Option<SelectedFile> {
    let mime = Some(file.mime.as_str()).filter(|m| !m.is_empty());

    if let Some(path) = &file.path {
        let mut selected = SelectedFile::from_path(path.clone());
        if let Some(mime) = mime {
            selected.media_type = mime.to_string();
        }
        return Some(selected);
    }

    file.bytes
        .as_ref()
        .map(|bytes| SelectedFile::from_bytes(file.name.clone(), mime, bytes.clone()))
}
