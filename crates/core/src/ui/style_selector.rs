//! Style cards.

use crate::presets::{PRESETS, StylePreset};
use eframe::egui;

/// A change of style requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StyleChange {
    Select(&'static str),
    /// Clicking the selected card again leaves only the free-text instructions.
    Clear,
}

/// Renders one selectable card per style and reports a click.
pub(crate) fn show(ui: &mut egui::Ui, selected: Option<&StylePreset>) -> Option<StyleChange> {
    let mut change = None;

    for preset in PRESETS {
        let is_selected = selected.is_some_and(|s| s.id == preset.id);

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            let title = egui::RichText::new(format!("{}  {}", preset.icon, preset.name)).strong();
            if ui.selectable_label(is_selected, title).clicked() {
                change = Some(if is_selected {
                    StyleChange::Clear
                } else {
                    StyleChange::Select(preset.id)
                });
            }
            ui.label(egui::RichText::new(preset.description).small().weak());
        });
    }

    change
}
