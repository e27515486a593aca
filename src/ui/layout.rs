//! Header with title, navigation links and connection status

use egui::{Color32, FontId, RichText, Ui};

use crate::state::{Navigation, Route};
use crate::ui::widgets::{ACCENT, ERROR, MUTED, SUCCESS};

/// Links shown in the header, in order
pub const NAV_LINKS: [(&str, Route); 3] = [
    ("Dashboard", Route::Dashboard),
    ("My Closet", Route::Items),
    ("Add Item", Route::AddItem),
];

/// A link is highlighted when its path equals the current route's path
pub fn is_active(link: Route, current: Route) -> bool {
    link.path() == current.path()
}

/// What the header shows about the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub online: bool,
    pub demo: bool,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match (self.demo, self.online) {
            (true, _) => "Demo data",
            (false, true) => "Online",
            (false, false) => "Offline",
        }
    }
}

/// Render the header bar and return the navigation the user asked for
pub fn render_header(ui: &mut Ui, current: Route, status: ConnectionStatus) -> Navigation {
    let mut navigation = Navigation::None;

    ui.horizontal(|ui| {
        ui.label(
            RichText::new("👕 Closet")
                .font(FontId::proportional(22.0))
                .color(Color32::from_rgb(200, 200, 255)),
        );
        ui.add_space(24.0);

        for (label, route) in NAV_LINKS {
            let active = is_active(route, current);
            let text = if active {
                RichText::new(label).strong().color(ACCENT)
            } else {
                RichText::new(label)
            };
            if ui.selectable_label(active, text).clicked() && !active {
                navigation = Navigation::Push(route);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let color = match (status.demo, status.online) {
                (true, _) => MUTED,
                (false, true) => SUCCESS,
                (false, false) => ERROR,
            };
            ui.label(RichText::new(format!("● {}", status.label())).color(color));
        });
    });

    navigation
}
