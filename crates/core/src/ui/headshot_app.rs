//! Main headshot application window.
//!
//! This module contains the `HeadshotApp` struct which implements the
//! `eframe::App` trait. It owns the [`Session`] and is the only place the
//! session is mutated from while the window is open.

use super::rendering::{color_image_from, draw_caption_overlay, fit_within, paint_texture};
use super::state::GenerationEvent;
use super::style_selector::{self, StyleChange};
use super::upload_zone::UploadZone;
use crate::acquisition::FileAcquired;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::file_codec::{self, FileCodec};
use crate::gemini::GeminiClient;
use crate::generation::ImageGenerator;
use crate::session::{GenerationStatus, Session};
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Accent used for headings and the primary button.
const ACCENT: egui::Color32 = egui::Color32::from_rgb(79, 70, 229);

/// The headshot editor window.
pub struct HeadshotApp {
    session: Session,
    generator: Arc<dyn ImageGenerator>,
    output_dir: PathBuf,

    // Surfaces
    upload_zone: UploadZone,
    result_texture: Option<egui::TextureHandle>,
    result_unreadable: bool,
    /// Outcome of the last download, shown under the result.
    notice: Option<String>,

    // Background generation
    rx: Receiver<GenerationEvent>,
    tx: Sender<GenerationEvent>,
}

impl HeadshotApp {
    /// Creates the window state.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    /// * `generator` - The service generation requests are sent to
    pub fn new(config: &Config, generator: Arc<dyn ImageGenerator>) -> Self {
        let (tx, rx) = channel();
        Self {
            session: Session::new(FileCodec::new(Some(config.max_upload_bytes))),
            generator,
            output_dir: config.output_dir.clone(),
            upload_zone: UploadZone::new(config.max_upload_bytes),
            result_texture: None,
            result_unreadable: false,
            notice: None,
            rx,
            tx,
        }
    }

    fn handle_acquired(&mut self, event: FileAcquired) {
        tracing::debug!(source = ?event.source, file = %event.file.name, "File acquired");
        if self.session.acquire(event.file).is_ok() {
            self.upload_zone.invalidate_preview();
            self.clear_result_texture();
            self.notice = None;
        }
    }

    /// Starts a generation on a background thread.
    ///
    /// A rejected request leaves its validation message in the session and
    /// spawns nothing.
    fn submit_generation(&mut self, ctx: &egui::Context) {
        let Ok(request) = self.session.begin_generation() else {
            return;
        };
        self.notice = None;

        let tx = self.tx.clone();
        let generator = Arc::clone(&self.generator);
        let ctx = ctx.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build();

            let outcome = match runtime {
                Ok(rt) => rt.block_on(generator.edit_image(&request)),
                Err(e) => Err(AppError::ui(format!("Failed to create async runtime: {}", e))),
            };

            let _ = tx.send(GenerationEvent::Finished {
                ticket: request.ticket,
                outcome,
            });
            ctx.request_repaint();
        });
    }

    /// Applies finished generations to the session.
    fn process_generation_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                GenerationEvent::Finished { ticket, outcome } => {
                    // Failures are recorded in the session for the banner
                    let _ = self.session.finish_generation(ticket, outcome);
                    if self.session.status() == GenerationStatus::Success {
                        self.clear_result_texture();
                    }
                }
            }
        }
    }

    fn clear_result_texture(&mut self) {
        self.result_texture = None;
        self.result_unreadable = false;
    }

    /// Decodes the current result into a texture once.
    fn ensure_result_texture(&mut self, ctx: &egui::Context) {
        if self.result_texture.is_some() || self.result_unreadable {
            return;
        }
        let Some(result) = self.session.result() else {
            return;
        };

        let decoded = file_codec::decode_payload(result.payload()).and_then(|bytes| {
            image::load_from_memory(&bytes).map_err(|e| AppError::file_read(e.to_string()))
        });

        match decoded {
            Ok(image) => {
                self.result_texture = Some(ctx.load_texture(
                    "generated-headshot",
                    color_image_from(&image),
                    egui::TextureOptions::LINEAR,
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Generated image could not be displayed");
                self.result_unreadable = true;
            }
        }
    }

    fn download(&mut self) {
        match self.session.download(&self.output_dir) {
            Ok(Some(path)) => self.notice = Some(format!("Saved to {}", path.display())),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to save generated image");
                self.notice = Some(format!("Could not save image: {}", e));
            }
        }
    }

    /// Renders the error banner, if any.
    fn render_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(error) = self.session.error().map(str::to_string) else {
            return;
        };

        let mut dismiss = false;
        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_rgb(254, 242, 242))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(254, 202, 202)))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(format!("⚠ {}", error)).color(egui::Color32::from_rgb(185, 28, 28)));
                    if ui.small_button("✕").clicked() {
                        dismiss = true;
                    }
                });
            });
        ui.add_space(8.0);

        if dismiss {
            self.session.dismiss_error();
        }
    }

    /// Renders the upload, style and instruction controls.
    fn render_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("1  Upload Source Image");
        ui.add_space(6.0);

        if let Some(event) = self.upload_zone.show(ui, self.session.source()) {
            self.handle_acquired(event);
        }

        if self.session.source().is_none() {
            return;
        }

        ui.add_space(16.0);
        ui.heading("2  Customize & Generate");
        ui.add_space(6.0);
        ui.label("Select Style");

        egui::ScrollArea::vertical()
            .max_height(260.0)
            .id_salt("styles_scroll")
            .show(ui, |ui| match style_selector::show(ui, self.session.preset()) {
                Some(StyleChange::Select(id)) => {
                    let _ = self.session.select_preset(Some(id));
                }
                Some(StyleChange::Clear) => {
                    let _ = self.session.select_preset(None);
                }
                None => {}
            });

        ui.add_space(8.0);
        ui.label("Additional Instructions (Optional)");
        ui.add(
            egui::TextEdit::multiline(self.session.instructions_mut())
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text("e.g. 'Make me smile slightly', 'Remove glasses', 'Make the background darker'"),
        );
        ui.add_space(10.0);

        let loading = self.session.status() == GenerationStatus::Loading;
        let label = if loading { "Generating..." } else { "✨ Generate Headshot" };
        let button = egui::Button::new(egui::RichText::new(label).strong().color(egui::Color32::WHITE))
            .fill(ACCENT)
            .min_size(egui::vec2(ui.available_width(), 44.0));

        if ui.add_enabled(self.session.can_generate(), button).clicked() {
            self.submit_generation(ctx);
        }
        if loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Waiting for Gemini...");
            });
        }
    }

    /// Renders the result panel for the current status.
    fn render_result(&mut self, ui: &mut egui::Ui) {
        ui.heading("3  Results");
        ui.add_space(6.0);

        let has_result = self.session.result().is_some();
        let buttons_height = if has_result { 64.0 } else { 0.0 };
        let size = egui::vec2(
            ui.available_width(),
            (ui.available_height() - buttons_height).max(300.0),
        );
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 12.0, egui::Color32::from_gray(246));

        match (&self.result_texture, has_result) {
            (Some(texture), true) => {
                let target = fit_within(texture.size_vec2(), rect.shrink(12.0));
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                paint_texture(&painter, texture, target, uv);
            }
            (None, true) if self.result_unreadable => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "The generated image could not be displayed",
                    egui::FontId::proportional(14.0),
                    egui::Color32::from_gray(120),
                );
            }
            _ => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Your professional headshot will appear here",
                    egui::FontId::proportional(15.0),
                    egui::Color32::from_gray(150),
                );
            }
        }

        if self.session.status() == GenerationStatus::Loading {
            draw_caption_overlay(&painter, rect, 150, "Enhancing image...");
            let spinner_rect = egui::Rect::from_center_size(rect.center() - egui::vec2(0.0, 48.0), egui::vec2(40.0, 40.0));
            ui.put(spinner_rect, egui::Spinner::new().size(40.0));
        }

        if !has_result {
            return;
        }

        ui.add_space(12.0);
        let mut generate_another = false;
        ui.horizontal(|ui| {
            if ui.button("⬇ Download Image").clicked() {
                self.download();
            }
            if ui.button("Generate Another").clicked() {
                generate_another = true;
            }
        });
        if let Some(notice) = &self.notice {
            ui.label(egui::RichText::new(notice).small());
        }

        if generate_another {
            self.session.reset_result();
            self.clear_result_texture();
            self.notice = None;
        }
    }
}

impl eframe::App for HeadshotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::light());

        self.process_generation_events();

        if let Some(event) = self.upload_zone.collect_drops(ctx) {
            self.handle_acquired(event);
        }

        self.ensure_result_texture(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("📷 ProShot AI").size(22.0).strong().color(ACCENT));
                ui.separator();
                ui.label("Professional headshots from any selfie");
            });
        });

        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(400.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().id_salt("controls_scroll").show(ui, |ui| {
                    ui.add_space(8.0);
                    self.render_error_banner(ui);
                    self.render_controls(ui, ctx);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_result(ui);
        });
    }
}

/// Opens the headshot window and blocks until it is closed.
///
/// # Errors
///
/// Returns an error if the Gemini client cannot be built or the window
/// fails to start.
pub fn run(config: Config) -> Result<()> {
    let generator: Arc<dyn ImageGenerator> = Arc::new(GeminiClient::new(&config)?);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ProShot AI")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "ProShot AI",
        options,
        Box::new(move |_cc| Ok(Box::new(HeadshotApp::new(&config, generator)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {}", e)))
}
