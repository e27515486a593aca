//! Browse view with filters, search and sorting

use egui::{ComboBox, RichText, ScrollArea, Ui};

use closet_core::{ClothingItem, FilterChange, ItemsFilters, SortBy, SortOrder};
use closet_integration::CatalogClient;

use crate::state::{Navigation, Route};
use crate::ui::remote::Remote;
use crate::ui::widgets::{self, MUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

pub struct ItemsList {
    /// What "Clear Filters" resets to
    base: ItemsFilters,
    filters: ItemsFilters,
    search: String,
    view: ViewMode,
    items: Remote<Vec<ClothingItem>>,
    categories: Remote<Vec<String>>,
    brands: Remote<Vec<String>>,
}

impl ItemsList {
    pub fn new(client: &CatalogClient, owner: Option<&str>, page_size: u32) -> Self {
        let mut base = ItemsFilters::newest(page_size);
        base.apply(FilterChange::Owner(owner.map(str::to_string)));
        Self {
            items: Remote::from_request(client.list_items(base.clone())),
            categories: Remote::from_request(client.list_categories()),
            brands: Remote::from_request(client.list_brands()),
            filters: base.clone(),
            base,
            search: String::new(),
            view: ViewMode::Grid,
        }
    }

    /// The filter set sent to the server: local filters with search merged in
    pub fn query(&self) -> ItemsFilters {
        self.filters.with_search(&self.search)
    }

    fn refetch(&mut self, client: &CatalogClient) {
        self.items = Remote::from_request(client.list_items(self.query()));
    }

    pub fn change_filter(&mut self, change: FilterChange, client: &CatalogClient) {
        let before = self.filters.clone();
        self.filters.apply(change);
        if self.filters != before {
            self.refetch(client);
        }
    }

    pub fn set_search(&mut self, text: &str, client: &CatalogClient) {
        if self.search != text {
            self.search = text.to_string();
            self.refetch(client);
        }
    }

    /// Reset to the newest-first default and empty the search
    pub fn clear(&mut self, client: &CatalogClient) {
        self.filters = self.base.clone();
        self.search.clear();
        self.refetch(client);
    }

    pub fn poll(&mut self) {
        self.items.poll();
        self.categories.poll();
        self.brands.poll();
    }

    pub fn is_loading(&self) -> bool {
        self.items.is_loading() || self.categories.is_loading() || self.brands.is_loading()
    }

    pub fn items(&self) -> Option<&[ClothingItem]> {
        self.items.value().map(Vec::as_slice)
    }

    pub fn render(&mut self, ui: &mut Ui, client: &CatalogClient) -> Navigation {
        self.poll();
        let mut navigation = Navigation::None;

        ui.horizontal(|ui| {
            widgets::page_title(ui, "My Closet");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if widgets::primary_button(ui, "Add Item", true) {
                    navigation = Navigation::Push(Route::AddItem);
                }
            });
        });

        self.render_filters(ui, client);
        ui.add_space(8.0);

        match &self.items {
            Remote::Loading(_) => widgets::loading(ui, "Loading items..."),
            Remote::Failed(message) => {
                widgets::status_line(ui, &format!("Could not load items: {}", message), true);
            }
            Remote::Loaded(items) if items.is_empty() => {
                if widgets::empty_state(ui, "No items found.", Some("Add your first item")) {
                    navigation = Navigation::Push(Route::AddItem);
                }
            }
            Remote::Loaded(items) => {
                let count = if items.len() == 1 { "1 item".to_string() } else { format!("{} items", items.len()) };
                ui.label(RichText::new(count).color(MUTED));
                ScrollArea::vertical().show(ui, |ui| {
                    let clicked = match self.view {
                        ViewMode::Grid => widgets::item_grid(ui, client, items),
                        ViewMode::List => {
                            let mut clicked = None;
                            for (i, item) in items.iter().enumerate() {
                                if widgets::item_row(ui, client, item) {
                                    clicked = Some(i);
                                }
                                ui.separator();
                            }
                            clicked
                        }
                    };
                    if let Some(i) = clicked {
                        navigation = Navigation::Push(Route::ItemDetail(items[i].id));
                    }
                });
            }
        }

        navigation
    }

    fn render_filters(&mut self, ui: &mut Ui, client: &CatalogClient) {
        let mut search = self.search.clone();
        let mut changes = Vec::new();
        let mut clear = false;

        ui.horizontal_wrapped(|ui| {
            ui.label("Search:");
            ui.add(egui::TextEdit::singleline(&mut search).hint_text("Name, brand, tags...").desired_width(200.0));

            let options = |remote: &Remote<Vec<String>>| remote.value().cloned().unwrap_or_default();
            if let Some(change) = value_menu(ui, "Category", self.filters.category.as_deref(), &options(&self.categories)) {
                changes.push(FilterChange::Category(change));
            }
            if let Some(change) = value_menu(ui, "Brand", self.filters.brand.as_deref(), &options(&self.brands)) {
                changes.push(FilterChange::Brand(change));
            }

            let mut sort_by = self.filters.effective_sort_by();
            ComboBox::from_id_salt("sort_by")
                .selected_text(format!("Sort: {}", sort_by.label()))
                .show_ui(ui, |ui| {
                    for option in SortBy::ALL {
                        ui.selectable_value(&mut sort_by, option, option.label());
                    }
                });
            if sort_by != self.filters.effective_sort_by() {
                changes.push(FilterChange::SortBy(Some(sort_by)));
            }

            let mut order = self.filters.effective_sort_order();
            ComboBox::from_id_salt("sort_order")
                .selected_text(order.label())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut order, SortOrder::Desc, SortOrder::Desc.label());
                    ui.selectable_value(&mut order, SortOrder::Asc, SortOrder::Asc.label());
                });
            if order != self.filters.effective_sort_order() {
                changes.push(FilterChange::SortOrder(Some(order)));
            }

            if ui.button("Clear Filters").clicked() {
                clear = true;
            }

            ui.separator();
            ui.selectable_value(&mut self.view, ViewMode::Grid, "Grid");
            ui.selectable_value(&mut self.view, ViewMode::List, "List");
        });

        if clear {
            self.clear(client);
            return;
        }
        for change in changes {
            self.change_filter(change, client);
        }
        self.set_search(&search, client);
    }
}

/// Menu over the distinct values with an "All" entry. Returns the new
/// selection when it changed; `Some(None)` clears the filter.
fn value_menu(ui: &mut Ui, label: &str, current: Option<&str>, values: &[String]) -> Option<Option<String>> {
    let mut selected = current.map(str::to_string);
    ComboBox::from_id_salt(label)
        .selected_text(format!("{}: {}", label, current.unwrap_or("All")))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut selected, None, "All");
            for value in values {
                ui.selectable_value(&mut selected, Some(value.clone()), value);
            }
        });
    (selected.as_deref() != current).then_some(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use closet_core::ClothingItemCreate;
    use closet_integration::{MemoryCatalog, SaveItem};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn settle(page: &mut ItemsList) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while page.is_loading() && Instant::now() < deadline {
            page.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn client_with(items: &[(&str, &str, &str)]) -> CatalogClient {
        let client = CatalogClient::with_backend(Arc::new(MemoryCatalog::new()), None).unwrap();
        for (name, category, brand) in items {
            let create = ClothingItemCreate {
                name: Some(name.to_string()),
                category: Some(category.to_string()),
                brand: Some(brand.to_string()),
                ..Default::default()
            };
            client.save_item(SaveItem::Create(create), Vec::new()).wait().unwrap();
        }
        client
    }

    fn names(page: &ItemsList) -> Vec<String> {
        page.items().unwrap().iter().map(|i| i.display_name().to_string()).collect()
    }

    #[test]
    fn test_filter_search_and_clear() {
        let client = client_with(&[
            ("Oxford Shirt", "Tops", "J.Crew"),
            ("Chinos", "Bottoms", "J.Crew"),
            ("Tee", "Tops", "Uniqlo"),
        ]);
        let mut page = ItemsList::new(&client, None, 50);
        settle(&mut page);
        assert_eq!(names(&page), vec!["Tee", "Chinos", "Oxford Shirt"]);
        assert_eq!(page.categories.value().map(Vec::len), Some(2));

        page.change_filter(FilterChange::Category(Some("Tops".into())), &client);
        settle(&mut page);
        assert_eq!(names(&page), vec!["Tee", "Oxford Shirt"]);

        page.set_search("oxford", &client);
        settle(&mut page);
        assert_eq!(names(&page), vec!["Oxford Shirt"]);
        assert_eq!(page.query().search.as_deref(), Some("oxford"));

        // Empty selection clears the field
        page.change_filter(FilterChange::Category(Some(String::new())), &client);
        page.set_search("   ", &client);
        settle(&mut page);
        assert!(page.query().category.is_none());
        assert!(page.query().search.is_none());
        assert_eq!(names(&page).len(), 3);

        page.change_filter(FilterChange::SortOrder(Some(SortOrder::Asc)), &client);
        page.set_search("tee", &client);
        page.clear(&client);
        settle(&mut page);
        assert_eq!(page.query(), ItemsFilters::list_default());
        assert_eq!(names(&page), vec!["Tee", "Chinos", "Oxford Shirt"]);
    }

    #[test]
    fn test_owner_and_page_size_shape_the_base_query() {
        let client = client_with(&[]);
        let page = ItemsList::new(&client, Some("sam"), 20);
        let query = page.query();
        assert_eq!(query.owner.as_deref(), Some("sam"));
        assert_eq!(query.limit, Some(20));
        assert_eq!(query.sort_by, Some(SortBy::CreatedAt));
    }

    #[test]
    fn test_renders_both_view_modes() {
        let client = client_with(&[("Boots", "Shoes", "Blundstone")]);
        let mut page = ItemsList::new(&client, None, 50);
        settle(&mut page);

        let ctx = egui::Context::default();
        for view in [ViewMode::Grid, ViewMode::List] {
            page.view = view;
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    assert!(page.render(ui, &client).is_none());
                });
            });
        }
    }
}
