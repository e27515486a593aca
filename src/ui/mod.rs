//! UI module for Closet
//!
//! Contains the header and every page, all drawn with egui.

mod dashboard;
mod item_detail;
mod item_form;
mod items_list;
mod layout;
mod remote;
mod widgets;

pub use dashboard::Dashboard;
pub use item_detail::ItemDetail;
pub use item_form::ItemFormPage;
pub use items_list::ItemsList;
pub use layout::{render_header, ConnectionStatus};
