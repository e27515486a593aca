//! Dashboard: recent items summary

use egui::{FontId, Frame, RichText, ScrollArea, Ui};

use closet_core::{ClothingItem, FilterChange, ItemsFilters};
use closet_integration::CatalogClient;

use crate::state::{Navigation, Route};
use crate::ui::remote::Remote;
use crate::ui::widgets::{self, MUTED};

pub struct Dashboard {
    recent: Remote<Vec<ClothingItem>>,
}

impl Dashboard {
    pub fn new(client: &CatalogClient, owner: Option<&str>) -> Self {
        Self {
            recent: Remote::from_request(client.list_items(Self::filters(owner))),
        }
    }

    /// Newest items first, scoped to the owner when one is configured
    pub fn filters(owner: Option<&str>) -> ItemsFilters {
        let mut filters = ItemsFilters::dashboard();
        filters.apply(FilterChange::Owner(owner.map(str::to_string)));
        filters
    }

    pub fn poll(&mut self) {
        self.recent.poll();
    }

    pub fn is_loading(&self) -> bool {
        self.recent.is_loading()
    }

    /// Number shown on the "Total Items" card: the items fetched for the
    /// recent list
    pub fn total_items(&self) -> usize {
        self.recent.value().map_or(0, Vec::len)
    }

    pub fn render(&mut self, ui: &mut Ui, client: &CatalogClient) -> Navigation {
        self.poll();
        let mut navigation = Navigation::None;

        widgets::page_title(ui, "Dashboard");

        ui.horizontal(|ui| {
            Frame::group(ui.style()).inner_margin(12.0).show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new("Total Items").color(MUTED));
                    ui.label(RichText::new(self.total_items().to_string()).font(FontId::proportional(28.0)));
                });
            });
            ui.add_space(12.0);
            Frame::group(ui.style()).inner_margin(12.0).show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new("Quick Actions").color(MUTED));
                    if widgets::primary_button(ui, "Add New Item", true) {
                        navigation = Navigation::Push(Route::AddItem);
                    }
                });
            });
        });

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            widgets::section_header(ui, "Recent Items");
            if ui.link("View all").clicked() {
                navigation = Navigation::Push(Route::Items);
            }
        });

        match &self.recent {
            Remote::Loading(_) => widgets::loading(ui, "Loading recent items..."),
            Remote::Failed(message) => {
                widgets::status_line(ui, &format!("Could not load items: {}", message), true);
            }
            Remote::Loaded(items) if items.is_empty() => {
                if widgets::empty_state(ui, "Your closet is empty. Add your first item!", Some("Add Item")) {
                    navigation = Navigation::Push(Route::AddItem);
                }
            }
            Remote::Loaded(items) => {
                ScrollArea::vertical().show(ui, |ui| {
                    if let Some(i) = widgets::item_grid(ui, client, items) {
                        navigation = Navigation::Push(Route::ItemDetail(items[i].id));
                    }
                });
            }
        }

        navigation
    }
}
