//! Small widgets shared by the pages

use egui::{Color32, FontId, Frame, Image, RichText, Sense, Stroke, Ui, Vec2};

use closet_core::ClothingItem;
use closet_integration::CatalogClient;

pub const ACCENT: Color32 = Color32::from_rgb(90, 110, 220);
pub const MUTED: Color32 = Color32::from_rgb(130, 130, 150);
pub const ERROR: Color32 = Color32::from_rgb(230, 90, 90);
pub const SUCCESS: Color32 = Color32::from_rgb(90, 190, 110);

const CARD_WIDTH: f32 = 180.0;
const THUMB_HEIGHT: f32 = 180.0;

pub fn page_title(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).font(FontId::proportional(26.0)).strong());
    ui.add_space(8.0);
}

pub fn section_header(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .font(FontId::proportional(16.0))
            .color(Color32::from_rgb(180, 180, 220)),
    );
    ui.add_space(3.0);
}

pub fn primary_button(ui: &mut Ui, text: &str, enabled: bool) -> bool {
    let button = egui::Button::new(RichText::new(text).color(Color32::WHITE))
        .fill(ACCENT)
        .min_size(Vec2::new(110.0, 30.0));
    ui.add_enabled(enabled, button).clicked()
}

pub fn danger_button(ui: &mut Ui, text: &str, enabled: bool) -> bool {
    let button = egui::Button::new(RichText::new(text).color(Color32::from_rgb(255, 170, 170)))
        .fill(Color32::from_rgb(80, 30, 30))
        .stroke(Stroke::new(1.0, Color32::from_rgb(120, 50, 50)))
        .min_size(Vec2::new(90.0, 30.0));
    ui.add_enabled(enabled, button).clicked()
}

pub fn loading(ui: &mut Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(RichText::new(text).color(MUTED));
    });
}

pub fn status_line(ui: &mut Ui, message: &str, is_error: bool) {
    let color = if is_error { ERROR } else { SUCCESS };
    ui.label(RichText::new(message).color(color));
}

/// Centered message with an optional call to action. Returns whether the
/// action was clicked.
pub fn empty_state(ui: &mut Ui, message: &str, action: Option<&str>) -> bool {
    let mut clicked = false;
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(RichText::new(message).font(FontId::proportional(16.0)).color(MUTED));
        if let Some(action) = action {
            ui.add_space(10.0);
            clicked = primary_button(ui, action, true);
        }
    });
    clicked
}

/// Image loaded through the installed loaders, or a placeholder
pub fn thumbnail(ui: &mut Ui, client: &CatalogClient, url: Option<&str>, size: Vec2) {
    match url {
        Some(url) => {
            ui.add(
                Image::new(client.resolve_image_url(url)).fit_to_exact_size(size),
            );
        }
        None => {
            let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
            ui.painter().rect_filled(rect, 4.0, Color32::from_gray(45));
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No image",
                FontId::proportional(13.0),
                MUTED,
            );
        }
    }
}

/// Grid card for an item. Returns whether it was clicked.
pub fn item_card(ui: &mut Ui, client: &CatalogClient, item: &ClothingItem) -> bool {
    let response = Frame::group(ui.style())
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            thumbnail(ui, client, item.thumbnail(), Vec2::new(CARD_WIDTH, THUMB_HEIGHT));
            ui.label(RichText::new(item.display_name()).strong());
            let mut meta = Vec::new();
            if let Some(category) = &item.category {
                meta.push(category.as_str());
            }
            if let Some(brand) = &item.brand {
                meta.push(brand.as_str());
            }
            if !meta.is_empty() {
                ui.label(RichText::new(meta.join(" · ")).small().color(MUTED));
            }
            if let Some(price) = item.price_label() {
                ui.label(RichText::new(price).color(SUCCESS));
            }
        })
        .response;
    response.interact(Sense::click()).clicked()
}

/// Compact row for the list view. Returns whether it was clicked.
pub fn item_row(ui: &mut Ui, client: &CatalogClient, item: &ClothingItem) -> bool {
    let response = ui
        .horizontal(|ui| {
            thumbnail(ui, client, item.thumbnail(), Vec2::splat(56.0));
            ui.vertical(|ui| {
                ui.label(RichText::new(item.display_name()).strong());
                let category = item.category.as_deref().unwrap_or("Uncategorized");
                let brand = item.brand.as_deref().unwrap_or("");
                ui.label(RichText::new(format!("{} {}", category, brand)).small().color(MUTED));
            });
            if let Some(price) = item.price_label() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(price).color(SUCCESS));
                });
            }
        })
        .response;
    response.interact(Sense::click()).clicked()
}

/// Wrapping grid of item cards. Returns the clicked item's index.
pub fn item_grid(ui: &mut Ui, client: &CatalogClient, items: &[ClothingItem]) -> Option<usize> {
    let mut clicked = None;
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = Vec2::new(12.0, 12.0);
        for (i, item) in items.iter().enumerate() {
            if item_card(ui, client, item) {
                clicked = Some(i);
            }
        }
    });
    clicked
}

/// Removable tag chips. Returns the tag whose remove button was clicked.
pub fn tag_chips<'a>(ui: &mut Ui, tags: impl Iterator<Item = &'a str>, removable: bool) -> Option<String> {
    let mut removed = None;
    ui.horizontal_wrapped(|ui| {
        for tag in tags {
            Frame::new()
                .fill(Color32::from_rgb(50, 55, 90))
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(8, 2))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(tag);
                        if removable && ui.small_button("×").clicked() {
                            removed = Some(tag.to_string());
                        }
                    });
                });
        }
    });
    removed
}
