//! Add and edit forms
//!
//! A [`FormSession`] moves `Editing → Submitting → Success`. A failed
//! submission raises a blocking alert and drops back to `Editing` with the
//! draft untouched. Selected files are uploaded before the item is saved.

use std::path::PathBuf;

use egui::{ComboBox, RichText, ScrollArea, TextEdit, Ui, Vec2};

use closet_core::{ClothingItem, DraftAction, DraftField, ItemDraft, ItemId, CATEGORIES};
use closet_integration::{CatalogClient, PendingRequest, SaveItem, SelectedFile};
use tracing::info;

use crate::state::{Navigation, Route};
use crate::ui::remote::describe;
use crate::ui::widgets::{self, MUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ItemId),
}

pub enum FormPhase {
    Editing,
    Submitting(PendingRequest<ClothingItem>),
    Success(ClothingItem),
}

pub struct FormSession {
    mode: FormMode,
    draft: ItemDraft,
    tag_input: String,
    path_input: String,
    files: Vec<SelectedFile>,
    existing_image_urls: Vec<String>,
    owner: Option<String>,
    phase: FormPhase,
    alert: Option<String>,
}

impl FormSession {
    pub fn create(owner: Option<&str>) -> Self {
        Self::with_draft(FormMode::Create, ItemDraft::new(), Vec::new(), owner)
    }

    pub fn edit(item: &ClothingItem) -> Self {
        Self::with_draft(
            FormMode::Edit(item.id),
            ItemDraft::from_item(item),
            item.image_urls.clone(),
            None,
        )
    }

    fn with_draft(mode: FormMode, draft: ItemDraft, existing_image_urls: Vec<String>, owner: Option<&str>) -> Self {
        Self {
            mode,
            draft,
            tag_input: String::new(),
            path_input: String::new(),
            files: Vec::new(),
            existing_image_urls,
            owner: owner.map(str::to_string),
            phase: FormPhase::Editing,
            alert: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &ItemDraft {
        &self.draft
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.phase, FormPhase::Editing)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting(_))
    }

    /// Submit is offered only while editing with no alert open
    pub fn can_submit(&self) -> bool {
        self.is_editing() && self.alert.is_none()
    }

    /// Apply an edit to the draft. Ignored unless editing.
    pub fn dispatch(&mut self, action: DraftAction) -> bool {
        self.is_editing() && self.draft.apply(action)
    }

    /// Add the typed tag and clear the input
    pub fn commit_tag_input(&mut self) -> bool {
        let tag = std::mem::take(&mut self.tag_input);
        self.dispatch(DraftAction::AddTag(tag))
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = SelectedFile>) {
        if self.is_editing() {
            self.files.extend(files);
        }
    }

    /// Add the typed path as a file and clear the input
    pub fn commit_path_input(&mut self) {
        let raw = std::mem::take(&mut self.path_input);
        let path = raw.trim();
        if !path.is_empty() {
            self.add_files([SelectedFile::from_path(PathBuf::from(path))]);
        }
    }

    pub fn clear_files(&mut self) {
        if self.is_editing() {
            self.files.clear();
        }
    }

    /// Validate locally, then start the upload and save. Returns whether a
    /// submission started.
    pub fn submit(&mut self, client: &CatalogClient) -> bool {
        if !self.can_submit() {
            return false;
        }

        let save = match self.mode {
            FormMode::Create => self.draft.to_create(self.owner.as_deref()).map(SaveItem::Create),
            FormMode::Edit(id) => self.draft.to_update().map(|changes| SaveItem::Update {
                id,
                changes,
                existing_image_urls: self.existing_image_urls.clone(),
            }),
        };
        match save {
            Ok(save) => {
                self.phase = FormPhase::Submitting(client.save_item(save, self.files.clone()));
                true
            }
            Err(e) => {
                self.alert = Some(e.to_string());
                false
            }
        }
    }

    /// Check a running submission. Success navigates to the list (create) or
    /// the item (edit).
    pub fn poll(&mut self) -> Navigation {
        let FormPhase::Submitting(pending) = &self.phase else {
            return Navigation::None;
        };
        let Some(result) = pending.try_recv() else {
            return Navigation::None;
        };
        match result {
            Ok(item) => {
                info!("Saved {}", item.display_name());
                let navigation = match self.mode {
                    FormMode::Create => Navigation::Replace(Route::Items),
                    FormMode::Edit(id) => Navigation::Replace(Route::ItemDetail(id)),
                };
                self.phase = FormPhase::Success(item);
                navigation
            }
            Err(e) => {
                let action = match self.mode {
                    FormMode::Create => "create",
                    FormMode::Edit(_) => "update",
                };
                self.alert = Some(format!("Failed to {} item: {}", action, describe(&e)));
                self.phase = FormPhase::Editing;
                Navigation::None
            }
        }
    }

    /// Files dropped onto the window
    fn take_dropped_files(&mut self, ui: &Ui) {
        let dropped = ui.ctx().input(|i| i.raw.dropped_files.clone());
        self.add_files(dropped.into_iter().filter_map(|file| {
            if let Some(bytes) = file.bytes {
                let name = if file.name.is_empty() { "image".to_string() } else { file.name };
                Some(SelectedFile::from_bytes(name, bytes))
            } else {
                file.path.map(SelectedFile::from_path)
            }
        }));
    }

    pub fn render(&mut self, ui: &mut Ui, client: &CatalogClient) -> Navigation {
        let navigation = self.poll();
        self.take_dropped_files(ui);

        let title = match self.mode {
            FormMode::Create => "Add New Item",
            FormMode::Edit(_) => "Edit Item",
        };
        widgets::page_title(ui, title);

        let enabled = self.can_submit();
        let mut actions = Vec::new();
        let mut submit = false;
        let mut cancel = false;

        ScrollArea::vertical().max_height(ui.available_height() - 50.0).show(ui, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                widgets::section_header(ui, "Details");
                text_field(ui, "Name", &self.draft, DraftField::Name, &mut actions);
                category_field(ui, &self.draft, &mut actions);
                text_field(ui, "Subcategory", &self.draft, DraftField::Subcategory, &mut actions);
                text_field(ui, "Brand", &self.draft, DraftField::Brand, &mut actions);
                text_field(ui, "Purchase date (YYYY-MM-DD)", &self.draft, DraftField::PurchaseDate, &mut actions);
                text_field(ui, "Purchase price", &self.draft, DraftField::PurchasePrice, &mut actions);
                multiline_field(ui, "Description", &self.draft, DraftField::Description, &mut actions);
                multiline_field(ui, "Notes", &self.draft, DraftField::Notes, &mut actions);

                ui.add_space(10.0);
                widgets::section_header(ui, "Tags");
                ui.horizontal(|ui| {
                    let response = ui.add(TextEdit::singleline(&mut self.tag_input).hint_text("Add a tag"));
                    let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if entered || ui.button("Add").clicked() {
                        self.commit_tag_input();
                        response.request_focus();
                    }
                });
                if let Some(tag) = widgets::tag_chips(ui, self.draft.tags.iter(), true) {
                    actions.push(DraftAction::RemoveTag(tag));
                }

                ui.add_space(10.0);
                widgets::section_header(ui, "Images");
                self.render_images(ui, client);
            });
        });

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let label = match (&self.phase, self.mode) {
                (FormPhase::Submitting(_), _) => "Saving...",
                (_, FormMode::Create) => "Add Item",
                (_, FormMode::Edit(_)) => "Save Changes",
            };
            if self.is_submitting() {
                ui.spinner();
            }
            submit = widgets::primary_button(ui, label, enabled);
            cancel = ui.add_enabled(!self.is_submitting(), egui::Button::new("Cancel")).clicked();
        });

        for action in actions {
            self.dispatch(action);
        }
        if submit {
            self.submit(client);
        }

        self.render_alert(ui);

        if cancel {
            return Navigation::Pop;
        }
        navigation
    }

    fn render_images(&mut self, ui: &mut Ui, client: &CatalogClient) {
        if !self.existing_image_urls.is_empty() {
            ui.label(RichText::new("Current images").color(MUTED));
            ui.horizontal_wrapped(|ui| {
                for url in &self.existing_image_urls {
                    widgets::thumbnail(ui, client, Some(url.as_str()), Vec2::splat(72.0));
                }
            });
        }

        ui.label(RichText::new("Drop image files onto the window, or enter a path:").color(MUTED));
        ui.horizontal(|ui| {
            let response = ui.add(TextEdit::singleline(&mut self.path_input).hint_text("/path/to/photo.jpg"));
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if entered || ui.button("Add file").clicked() {
                self.commit_path_input();
            }
        });

        if !self.files.is_empty() {
            ui.label(format!("{} new file(s) selected:", self.files.len()));
            for file in &self.files {
                ui.label(RichText::new(format!("• {}", file.name)).small());
            }
            if ui.small_button("Clear files").clicked() {
                self.clear_files();
            }
        }
    }

    fn render_alert(&mut self, ui: &mut Ui) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Could not save")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ui.ctx(), |ui| {
                widgets::status_line(ui, &message, true);
                ui.add_space(8.0);
                dismissed = ui.button("OK").clicked();
            });
        if dismissed {
            self.dismiss_alert();
        }
    }
}

/// Form page: loads the item first when editing
pub enum ItemFormPage {
    Loading(ItemId, PendingRequest<ClothingItem>),
    NotFound,
    Ready(FormSession),
}

impl ItemFormPage {
    pub fn create(owner: Option<&str>) -> Self {
        Self::Ready(FormSession::create(owner))
    }

    pub fn edit(client: &CatalogClient, id: ItemId) -> Self {
        Self::Loading(id, client.get_item(id))
    }

    pub fn session(&self) -> Option<&FormSession> {
        match self {
            Self::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut FormSession> {
        match self {
            Self::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        match self {
            Self::Loading(..) => true,
            Self::NotFound => false,
            Self::Ready(session) => session.is_submitting(),
        }
    }

    pub fn poll(&mut self) -> Navigation {
        match self {
            Self::Loading(_, pending) => {
                match pending.try_recv() {
                    Some(Ok(item)) => *self = Self::Ready(FormSession::edit(&item)),
                    Some(Err(_)) => *self = Self::NotFound,
                    None => {}
                }
                Navigation::None
            }
            Self::NotFound => Navigation::None,
            Self::Ready(session) => session.poll(),
        }
    }

    pub fn render(&mut self, ui: &mut Ui, client: &CatalogClient) -> Navigation {
        if let Self::Loading(..) = self {
            self.poll();
        }
        match self {
            Self::Loading(..) => {
                widgets::loading(ui, "Loading item...");
                Navigation::None
            }
            Self::NotFound => {
                if widgets::empty_state(ui, "Item not found", Some("Back to My Closet")) {
                    Navigation::Replace(Route::Items)
                } else {
                    Navigation::None
                }
            }
            Self::Ready(session) => session.render(ui, client),
        }
    }
}

// -- UI helpers --

fn text_field(ui: &mut Ui, label: &str, draft: &ItemDraft, field: DraftField, actions: &mut Vec<DraftAction>) {
    let mut value = draft.field(field).to_string();
    ui.horizontal(|ui| {
        ui.label(format!("{}:", label));
        if ui.text_edit_singleline(&mut value).changed() {
            actions.push(DraftAction::Set(field, value.clone()));
        }
    });
}

fn multiline_field(ui: &mut Ui, label: &str, draft: &ItemDraft, field: DraftField, actions: &mut Vec<DraftAction>) {
    let mut value = draft.field(field).to_string();
    ui.label(format!("{}:", label));
    if ui.add(TextEdit::multiline(&mut value).desired_rows(3)).changed() {
        actions.push(DraftAction::Set(field, value));
    }
}

fn category_field(ui: &mut Ui, draft: &ItemDraft, actions: &mut Vec<DraftAction>) {
    let mut selected = draft.category.clone();
    ui.horizontal(|ui| {
        ui.label("Category:");
        let shown = if selected.is_empty() { "Select category" } else { selected.as_str() }.to_string();
        ComboBox::from_id_salt("item_category")
            .selected_text(shown)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, String::new(), "None");
                for category in CATEGORIES {
                    ui.selectable_value(&mut selected, category.to_string(), category);
                }
            });
    });
    if selected != draft.category {
        actions.push(DraftAction::Set(DraftField::Category, selected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use closet_core::{ClothingItemCreate, InputError};
    use closet_integration::MemoryCatalog;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn client() -> CatalogClient {
        CatalogClient::with_backend(Arc::new(MemoryCatalog::new()), None).unwrap()
    }

    fn settle(session: &mut FormSession) -> Navigation {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut navigation = Navigation::None;
        while session.is_submitting() && Instant::now() < deadline {
            navigation = navigation.or(session.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        navigation
    }

    fn photo(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, vec![0x89u8, 0x50, 0x4E, 0x47])
    }

    #[test]
    fn test_create_with_files_navigates_to_list() {
        let client = client();
        let mut session = FormSession::create(Some("sam"));
        session.dispatch(DraftAction::Set(DraftField::Name, "Blue Shirt".into()));
        session.dispatch(DraftAction::Set(DraftField::Category, "Tops".into()));
        session.tag_input = " casual ".into();
        assert!(session.commit_tag_input());
        session.add_files([photo("front.png")]);

        assert!(session.submit(&client));
        assert!(session.is_submitting());
        assert!(!session.dispatch(DraftAction::Set(DraftField::Name, "ignored".into())));
        assert!(!session.submit(&client), "one submission at a time");

        assert_eq!(settle(&mut session), Navigation::Replace(Route::Items));
        let FormPhase::Success(saved) = &session.phase else {
            panic!("expected success");
        };
        assert_eq!(saved.image_urls, vec!["/uploads/1-front.png"]);
        assert_eq!(saved.tags, vec!["casual"]);
        assert_eq!(saved.owner, "sam");
    }

    #[test]
    fn test_invalid_price_raises_alert_without_request() {
        let client = client();
        let mut session = FormSession::create(None);
        session.dispatch(DraftAction::Set(DraftField::PurchasePrice, "-5".into()));

        assert!(!session.submit(&client));
        assert!(session.is_editing());
        assert_eq!(session.alert(), Some(InputError::NegativePrice.to_string().as_str()));
        assert!(!session.can_submit());

        session.dismiss_alert();
        session.dispatch(DraftAction::Set(DraftField::PurchasePrice, "5".into()));
        assert!(session.can_submit());
        assert!(client.list_items(closet_core::ItemsFilters::list_default()).wait().unwrap().is_empty());
    }

    #[test]
    fn test_failed_upload_keeps_draft_and_returns_to_editing() {
        let client = client();
        let mut session = FormSession::create(None);
        session.dispatch(DraftAction::Set(DraftField::Name, "Raincoat".into()));
        session.add_files([SelectedFile::from_bytes("receipt.pdf", vec![1u8])]);

        assert!(session.submit(&client));
        assert_eq!(settle(&mut session), Navigation::None);
        assert!(session.is_editing());
        assert!(session.alert().unwrap().starts_with("Failed to create item"));
        assert_eq!(session.draft().name, "Raincoat");
        assert_eq!(session.files().len(), 1);
    }

    #[test]
    fn test_edit_appends_uploads_and_returns_to_detail() {
        let client = client();
        let existing = client
            .save_item(
                SaveItem::Create(ClothingItemCreate {
                    name: Some("Denim Jacket".into()),
                    ..Default::default()
                }),
                vec![photo("old.png")],
            )
            .wait()
            .unwrap();

        let mut page = ItemFormPage::edit(&client, existing.id);
        let deadline = Instant::now() + Duration::from_secs(5);
        while page.session().is_none() && Instant::now() < deadline {
            page.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        let session = page.session_mut().unwrap();
        assert_eq!(session.mode(), FormMode::Edit(existing.id));
        assert_eq!(session.draft().name, "Denim Jacket");

        session.dispatch(DraftAction::Set(DraftField::Brand, "Levi's".into()));
        session.add_files([photo("new.png")]);
        assert!(session.submit(&client));
        assert_eq!(settle(session), Navigation::Replace(Route::ItemDetail(existing.id)));

        let updated = client.get_item(existing.id).wait().unwrap();
        assert_eq!(updated.image_urls, vec!["/uploads/1-old.png", "/uploads/2-new.png"]);
        assert_eq!(updated.brand.as_deref(), Some("Levi's"));
    }

    #[test]
    fn test_edit_of_missing_item_is_not_found() {
        let client = client();
        let mut page = ItemFormPage::edit(&client, ItemId(77));
        let deadline = Instant::now() + Duration::from_secs(5);
        while page.is_busy() && Instant::now() < deadline {
            page.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(page, ItemFormPage::NotFound));
    }

    #[test]
    fn test_path_input_and_clear_files() {
        let mut session = FormSession::create(None);
        session.path_input = "  /tmp/photos/skirt.jpg ".into();
        session.commit_path_input();
        assert_eq!(session.files().len(), 1);
        assert_eq!(session.files()[0].name, "skirt.jpg");

        session.path_input = "   ".into();
        session.commit_path_input();
        assert_eq!(session.files().len(), 1);

        session.clear_files();
        assert!(session.files().is_empty());
    }

    #[test]
    fn test_form_renders_headless_with_alert() {
        let client = client();
        let mut page = ItemFormPage::create(None);
        if let Some(session) = page.session_mut() {
            session.dispatch(DraftAction::Set(DraftField::PurchaseDate, "someday".into()));
            session.submit(&client);
        }

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                assert!(page.render(ui, &client).is_none());
            });
        });
        assert!(page.session().unwrap().alert().is_some());
    }
}
