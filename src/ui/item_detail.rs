//! Single item view with delete confirmation

use egui::{Grid, RichText, ScrollArea, Ui, Vec2};

use closet_core::{ClothingItem, ItemId};
use closet_integration::{CatalogClient, PendingRequest};

use crate::state::{Navigation, Route};
use crate::ui::remote::{describe, Remote};
use crate::ui::widgets::{self, MUTED};

pub struct ItemDetail {
    id: ItemId,
    item: Remote<ClothingItem>,
    selected_image: usize,
    confirming_delete: bool,
    pending_delete: Option<PendingRequest<()>>,
    /// Status line, e.g. a failed delete
    status: Option<String>,
}

impl ItemDetail {
    pub fn new(client: &CatalogClient, id: ItemId) -> Self {
        Self {
            id,
            item: Remote::from_request(client.get_item(id)),
            selected_image: 0,
            confirming_delete: false,
            pending_delete: None,
            status: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn is_loading(&self) -> bool {
        self.item.is_loading() || self.pending_delete.is_some()
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming_delete
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Ask for confirmation before deleting
    pub fn request_delete(&mut self) {
        if self.item.value().is_some() && self.pending_delete.is_none() {
            self.confirming_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    pub fn confirm_delete(&mut self, client: &CatalogClient) {
        if !self.confirming_delete {
            return;
        }
        self.confirming_delete = false;
        self.status = None;
        self.pending_delete = Some(client.delete_item(self.id));
    }

    /// Poll outstanding requests. A finished delete navigates to the list.
    pub fn poll(&mut self) -> Navigation {
        self.item.poll();

        let Some(pending) = &self.pending_delete else {
            return Navigation::None;
        };
        let Some(result) = pending.try_recv() else {
            return Navigation::None;
        };
        self.pending_delete = None;
        match result {
            Ok(()) => Navigation::Replace(Route::Items),
            Err(e) => {
                self.status = Some(format!("Failed to delete item: {}", describe(&e)));
                Navigation::None
            }
        }
    }

    pub fn render(&mut self, ui: &mut Ui, client: &CatalogClient) -> Navigation {
        let mut navigation = self.poll();

        if ui.button("← Back").clicked() {
            navigation = navigation.or(Navigation::Pop);
        }
        ui.add_space(6.0);

        let item = match &self.item {
            Remote::Loading(_) => {
                widgets::loading(ui, "Loading item...");
                return navigation;
            }
            Remote::Failed(_) => {
                // Fetch failures and missing items look the same
                if widgets::empty_state(ui, "Item not found", Some("Back to My Closet")) {
                    navigation = navigation.or(Navigation::Replace(Route::Items));
                }
                return navigation;
            }
            Remote::Loaded(item) => item.clone(),
        };

        let busy = self.pending_delete.is_some();
        ui.horizontal(|ui| {
            widgets::page_title(ui, item.display_name());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if widgets::danger_button(ui, if busy { "Deleting..." } else { "Delete" }, !busy) {
                    self.request_delete();
                }
                if widgets::primary_button(ui, "Edit", !busy) {
                    navigation = navigation.clone().or(Navigation::Push(Route::EditItem(self.id)));
                }
            });
        });

        if let Some(status) = &self.status {
            widgets::status_line(ui, status, true);
        }

        ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_top(|ui| {
                self.render_images(ui, client, &item);
                ui.add_space(16.0);
                ui.vertical(|ui| render_fields(ui, &item));
            });
        });

        self.render_confirm(ui, client);
        navigation
    }

    fn render_images(&mut self, ui: &mut Ui, client: &CatalogClient, item: &ClothingItem) {
        ui.vertical(|ui| {
            let main = item.image_urls.get(self.selected_image).or(item.image_urls.first());
            widgets::thumbnail(ui, client, main.map(String::as_str), Vec2::splat(320.0));
            if item.image_urls.len() > 1 {
                ui.horizontal_wrapped(|ui| {
                    for (i, url) in item.image_urls.iter().enumerate() {
                        let response = ui.add(
                            egui::ImageButton::new(
                                egui::Image::new(client.resolve_image_url(url))
                                    .fit_to_exact_size(Vec2::splat(56.0)),
                            )
                            .selected(i == self.selected_image),
                        );
                        if response.clicked() {
                            self.selected_image = i;
                        }
                    }
                });
            }
        });
    }

    fn render_confirm(&mut self, ui: &mut Ui, client: &CatalogClient) {
        if !self.confirming_delete {
            return;
        }
        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Delete item")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ui.ctx(), |ui| {
                ui.label("Are you sure you want to delete this item?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    confirmed = widgets::danger_button(ui, "Delete", true);
                    cancelled = ui.button("Cancel").clicked();
                });
            });
        if confirmed {
            self.confirm_delete(client);
        } else if cancelled {
            self.cancel_delete();
        }
    }
}

fn render_fields(ui: &mut Ui, item: &ClothingItem) {
    if let Some(price) = item.price_label() {
        ui.label(RichText::new(price).size(20.0).color(widgets::SUCCESS));
        ui.add_space(6.0);
    }

    Grid::new("item_fields").num_columns(2).spacing([16.0, 6.0]).show(ui, |ui| {
        let rows = [
            ("Category", item.category.clone()),
            ("Subcategory", item.subcategory.clone()),
            ("Brand", item.brand.clone()),
            ("Purchased", item.purchase_date.map(|d| d.format("%B %-d, %Y").to_string())),
            ("Owner", Some(item.owner.clone())),
            ("Added", Some(item.created_at.format("%Y-%m-%d %H:%M").to_string())),
            ("Updated", item.updated_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())),
        ];
        for (label, value) in rows {
            if let Some(value) = value {
                ui.label(RichText::new(label).color(MUTED));
                ui.label(value);
                ui.end_row();
            }
        }
    });

    if let Some(description) = &item.description {
        ui.add_space(8.0);
        widgets::section_header(ui, "Description");
        ui.label(description);
    }

    if !item.tags.is_empty() {
        ui.add_space(8.0);
        widgets::section_header(ui, "Tags");
        widgets::tag_chips(ui, item.tags.iter().map(String::as_str), false);
    }

    if let Some(notes) = &item.notes {
        ui.add_space(8.0);
        widgets::section_header(ui, "Notes");
        ui.label(notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use closet_core::ClothingItemCreate;
    use closet_integration::{MemoryCatalog, SaveItem};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn client() -> CatalogClient {
        CatalogClient::with_backend(Arc::new(MemoryCatalog::new()), None).unwrap()
    }

    fn add(client: &CatalogClient, name: &str) -> ClothingItem {
        let create = ClothingItemCreate {
            name: Some(name.into()),
            tags: vec!["wool".into()],
            ..Default::default()
        };
        client.save_item(SaveItem::Create(create), Vec::new()).wait().unwrap()
    }

    /// Poll until idle and return the last navigation requested
    fn settle(page: &mut ItemDetail) -> Navigation {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut navigation = Navigation::None;
        while Instant::now() < deadline {
            navigation = navigation.or(page.poll());
            if !page.is_loading() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        navigation
    }

    #[test]
    fn test_delete_requires_confirmation_and_returns_to_list() {
        let client = client();
        let item = add(&client, "Cardigan");
        let mut page = ItemDetail::new(&client, item.id);
        settle(&mut page);

        page.confirm_delete(&client);
        assert!(!page.is_loading(), "nothing is deleted without confirmation");

        page.request_delete();
        assert!(page.is_confirming());
        page.cancel_delete();
        assert!(!page.is_confirming());

        page.request_delete();
        page.confirm_delete(&client);
        assert_eq!(settle(&mut page), Navigation::Replace(Route::Items));

        let remaining = client.list_items(closet_core::ItemsFilters::list_default()).wait().unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_failed_delete_keeps_item_and_shows_status() {
        let client = client();
        let item = add(&client, "Poncho");
        let mut page = ItemDetail::new(&client, item.id);
        settle(&mut page);

        // Removed behind the page's back
        client.delete_item(item.id).wait().unwrap();

        page.request_delete();
        page.confirm_delete(&client);
        assert_eq!(settle(&mut page), Navigation::None);
        assert!(page.status().unwrap().starts_with("Failed to delete item"));
        assert!(page.item.value().is_some());
    }

    #[test]
    fn test_missing_item_renders_not_found() {
        let client = client();
        let mut page = ItemDetail::new(&client, ItemId(404));
        settle(&mut page);
        assert!(page.item.error().is_some());

        page.request_delete();
        assert!(!page.is_confirming());

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                assert!(page.render(ui, &client).is_none());
            });
        });
    }

    #[test]
    fn test_renders_loaded_item_with_confirm_window() {
        let client = client();
        let item = add(&client, "Trench Coat");
        let mut page = ItemDetail::new(&client, item.id);
        settle(&mut page);
        page.request_delete();

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                assert!(page.render(ui, &client).is_none());
            });
        });
        assert!(page.is_confirming());
    }
}
