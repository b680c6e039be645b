// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The host owns the document and the element list. The drawing engine
//! reports every change as a fresh normalized list which is adopted here
//! and handed back on the next host-side edit.

use drawzone::io::image_size::ImageSizeCache;
use drawzone::models::document::Document;
use drawzone::models::element::{self, ElementPatch};
use drawzone::util::geometry::Size;
use drawzone::{DrawZone, Element, ZoneConfig, ZoneEvent, ZoneOptions};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

use crate::ui::{canvas, properties, toolbar};

/// Result of a background image load.
struct LoadedImageData {
    source: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    document: Option<Document>,
}

/// Main application state.
pub struct DrawZoneApp {
    /// Drawing engine for the current image
    zone: DrawZone,

    /// Options last pushed into the engine
    options: ZoneOptions,

    /// Current document (if an image is loaded)
    document: Option<Document>,

    /// Pixel sizes of images opened this session
    sizes: ImageSizeCache,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImageData, String>>>,

    /// Loading state message
    loading_message: Option<String>,
}

impl DrawZoneApp {
    pub fn new(config: ZoneConfig) -> Self {
        let options = ZoneOptions::default();
        let mut zone = DrawZone::new(config);
        zone.set_options(options.clone());
        Self {
            zone,
            options,
            document: None,
            sizes: ImageSizeCache::new(),
            image_texture: None,
            image_loader: None,
            loading_message: None,
        }
    }

    fn elements(&self) -> &[Element] {
        self.document
            .as_ref()
            .map(|d| d.elements.as_slice())
            .unwrap_or_default()
    }

    /// Replace the element list after a host-side edit.
    fn replace_elements(&mut self, elements: Vec<Element>) {
        self.zone.set_elements(elements.clone());
        if let Some(ref mut document) = self.document {
            document.elements = elements;
        }
    }

    fn apply_events(&mut self, events: Vec<ZoneEvent>) {
        for event in events {
            match event {
                ZoneEvent::Changed(elements) => {
                    log::debug!("Engine reported {} elements", elements.len());
                    if let Some(ref mut document) = self.document {
                        document.elements = elements;
                    }
                }
                ZoneEvent::DefaultRectChanged(rect) => {
                    log::debug!("Default rectangle is now {}x{}", rect.width, rect.height);
                    self.options.initial_rect = Some(rect);
                    self.zone.set_options(self.options.clone());
                }
            }
        }
    }

    fn apply_properties_action(&mut self, action: properties::PropertiesAction) {
        let current = self.elements().to_vec();
        let next = match action {
            properties::PropertiesAction::None => return,
            properties::PropertiesAction::Select(id) => element::select(&current, &id),
            properties::PropertiesAction::Relabel(id, label) => {
                let patch = ElementPatch {
                    label: Some(label),
                    ..Default::default()
                };
                element::update(&current, &id, &patch)
            }
            properties::PropertiesAction::Delete(id) => {
                log::info!("Deleted region {}", id);
                current.into_iter().filter(|e| e.id != id).collect()
            }
        };
        self.replace_elements(next);
    }

    fn delete_selected(&mut self) {
        let before = self.elements().len();
        let remaining: Vec<Element> = self
            .elements()
            .iter()
            .filter(|e| !e.selected)
            .cloned()
            .collect();
        if remaining.len() != before {
            log::info!("Deleted selected region, total: {}", remaining.len());
            self.replace_elements(remaining);
        }
    }

    /// Export the document to a file.
    fn export_document(&mut self, path: PathBuf) {
        if let Some(ref mut document) = self.document {
            document.shape = self.options.shape;
            match drawzone::io::serialization::export_document(document, &path) {
                Ok(_) => log::info!("Exported {} regions to {}", document.elements.len(), path.display()),
                Err(e) => log::error!("Failed to export document: {:#}", e),
            }
        }
    }

    /// Import a document and load the image it references (asynchronously).
    fn import_document(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading document and image...".to_string());

        std::thread::spawn(move || {
            let result = (|| -> Result<LoadedImageData, String> {
                let document = drawzone::io::serialization::import_document(&path)
                    .map_err(|e| format!("Failed to import document: {:#}", e))?;

                let image_path = PathBuf::from(&document.image_source);
                if !image_path.exists() {
                    return Err(format!("Referenced image not found: {}", image_path.display()));
                }

                let loaded = drawzone::io::media::load_image(&image_path)
                    .map_err(|e| format!("Failed to load image: {}", e))?;

                Ok(LoadedImageData {
                    source: document.image_source.clone(),
                    width: loaded.width,
                    height: loaded.height,
                    pixels: loaded.pixels,
                    document: Some(document),
                })
            })();

            let _ = sender.send(result);
        });
    }

    /// Load an image file and create a texture for display (asynchronously).
    fn load_image_file(&mut self, path: PathBuf) {
        let source = path.to_string_lossy().to_string();

        // Reading the header is cheap and rejects non-images before decoding
        match self.sizes.get_or_load(&source) {
            Ok(size) => log::info!("Opening {} ({}x{})", source, size.width, size.height),
            Err(e) => {
                log::error!("Cannot open {}: {}", source, e);
                return;
            }
        }

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = drawzone::io::media::load_image(&path)
                .map(|loaded| LoadedImageData {
                    source,
                    width: loaded.width,
                    height: loaded.height,
                    pixels: loaded.pixels,
                    document: None,
                })
                .map_err(|e| format!("Failed to load image: {}", e));

            let _ = sender.send(result);
        });
    }

    fn finish_loading(&mut self, ctx: &egui::Context, loaded: LoadedImageData) {
        let size = [loaded.width as usize, loaded.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
        self.image_texture = Some(ctx.load_texture(
            "loaded_image",
            color_image,
            egui::TextureOptions::LINEAR,
        ));

        let image_size = Size::new(f64::from(loaded.width), f64::from(loaded.height));
        self.sizes.insert(loaded.source.clone(), image_size);

        let document = match loaded.document {
            Some(document) => {
                self.options.shape = document.shape;
                document
            }
            None => Document::new(loaded.source, loaded.width, loaded.height),
        };

        self.options.initial_rect = None;
        self.zone.set_image(image_size);
        self.zone.set_options(self.options.clone());
        self.zone.set_elements(document.elements.clone());
        log::info!(
            "Image {} ready with {} regions",
            document.image_source,
            document.elements.len()
        );
        self.document = Some(document);
    }

    fn close_image(&mut self) {
        if let Some(document) = self.document.take() {
            self.sizes.evict(&document.image_source);
            log::info!("Closed {}", document.image_source);
        }
        self.image_texture = None;
        self.zone.clear_image();
    }
}

impl eframe::App for DrawZoneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed image loading
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;

                match result {
                    Ok(loaded) => self.finish_loading(ctx, loaded),
                    Err(e) => log::error!("{}", e),
                }
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                            .pick_file()
                        {
                            self.load_image_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Load Document...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Documents", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.import_document(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.add_enabled_ui(self.document.is_some(), |ui| {
                        ui.menu_button("Export Document", |ui| {
                            if ui.button("Export as YAML...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("YAML", &["yaml", "yml"])
                                    .set_file_name("regions.yaml")
                                    .save_file()
                                {
                                    self.export_document(path);
                                }
                                ui.close_menu();
                            }
                            if ui.button("Export as JSON...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("JSON", &["json"])
                                    .set_file_name("regions.json")
                                    .save_file()
                                {
                                    self.export_document(path);
                                }
                                ui.close_menu();
                            }
                        });
                        if ui.button("Close Image").clicked() {
                            self.close_image();
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let has_selection = self.elements().iter().any(|e| e.selected);
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        self.delete_selected();
                        ui.close_menu();
                    }
                    if ui.button("Deselect All").clicked() {
                        let next = element::deselect_all(self.elements());
                        self.replace_elements(next);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.zone.zoom_in();
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.zone.zoom_out();
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.zone.reset_view();
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let (options_changed, toolbar_action) = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &mut self.options))
            .inner;
        if options_changed {
            log::debug!("Options changed: {:?}", self.options);
            self.zone.set_options(self.options.clone());
        }
        match toolbar_action {
            toolbar::ToolbarAction::ZoomIn => {
                self.zone.zoom_in();
            }
            toolbar::ToolbarAction::ZoomOut => {
                self.zone.zoom_out();
            }
            toolbar::ToolbarAction::ResetView => self.zone.reset_view(),
            toolbar::ToolbarAction::None => {}
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.zone.zoom() {
                    Some(zoom) => ui.label(format!("Zoom {:.0}%", zoom * 100.0)),
                    None => ui.label("No image"),
                };
                ui.separator();
                ui.label(format!("{} regions", self.elements().len()));
                if self.zone.is_multi_touch() {
                    ui.separator();
                    ui.label("Pinch");
                }
            });
        });

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, self.elements()))
            .inner;
        self.apply_properties_action(properties_action);

        // Keyboard shortcuts, unless a text field has focus
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                if self.zone.draft().is_some() {
                    self.zone.cancel_draft();
                } else {
                    let next = element::deselect_all(self.elements());
                    self.replace_elements(next);
                }
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
                let events = self.zone.finish_polygon();
                self.apply_events(events);
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
                self.delete_selected();
            }
        }

        // Main canvas (center)
        let events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    Vec::new()
                } else {
                    canvas::show(ui, &mut self.zone, self.image_texture.as_ref())
                }
            })
            .inner;
        self.apply_events(events);
    }
}
