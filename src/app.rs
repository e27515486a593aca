//! The eframe application: header, current page and navigation

use std::time::{Duration, Instant};

use closet_integration::{CatalogClient, PendingRequest};
use tracing::{debug, info};

use crate::settings::AppSettings;
use crate::state::{Navigation, Route, Router};
use crate::ui::{render_header, ConnectionStatus, Dashboard, ItemDetail, ItemFormPage, ItemsList};

const HEALTH_INTERVAL: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The page mounted for the current route
pub enum Page {
    Dashboard(Dashboard),
    Items(ItemsList),
    Detail(ItemDetail),
    Form(ItemFormPage),
}

impl Page {
    /// Mount the page for `route`; mounting starts its fetches
    pub fn open(route: Route, client: &CatalogClient, settings: &AppSettings) -> Self {
        let owner = settings.catalog.owner();
        match route {
            Route::Dashboard => Page::Dashboard(Dashboard::new(client, owner)),
            Route::Items => Page::Items(ItemsList::new(client, owner, settings.catalog.page_size)),
            Route::ItemDetail(id) => Page::Detail(ItemDetail::new(client, id)),
            Route::EditItem(id) => Page::Form(ItemFormPage::edit(client, id)),
            Route::AddItem => Page::Form(ItemFormPage::create(owner)),
        }
    }

    pub fn is_busy(&self) -> bool {
        match self {
            Page::Dashboard(page) => page.is_loading(),
            Page::Items(page) => page.is_loading(),
            Page::Detail(page) => page.is_loading(),
            Page::Form(page) => page.is_busy(),
        }
    }

    pub fn render(&mut self, ui: &mut egui::Ui, client: &CatalogClient) -> Navigation {
        match self {
            Page::Dashboard(page) => page.render(ui, client),
            Page::Items(page) => page.render(ui, client),
            Page::Detail(page) => page.render(ui, client),
            Page::Form(page) => page.render(ui, client),
        }
    }
}

pub struct ClosetApp {
    client: CatalogClient,
    settings: AppSettings,
    router: Router,
    page: Page,
    health: Option<PendingRequest<()>>,
    last_health_check: Instant,
}

impl ClosetApp {
    pub fn new(client: CatalogClient, settings: AppSettings) -> Self {
        let router = Router::default();
        let page = Page::open(router.current(), &client, &settings);
        let health = Some(client.check_health());
        Self {
            client,
            settings,
            router,
            page,
            health,
            last_health_check: Instant::now(),
        }
    }

    pub fn current_route(&self) -> Route {
        self.router.current()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Apply a navigation command and remount the page if the route changed
    pub fn navigate(&mut self, navigation: Navigation) -> bool {
        if !self.router.apply(navigation) {
            return false;
        }
        let route = self.router.current();
        debug!("Navigated to {}", route);
        self.page = Page::open(route, &self.client, &self.settings);
        true
    }

    fn poll_health(&mut self) {
        if let Some(pending) = &self.health {
            if let Some(result) = pending.try_recv() {
                if let Err(e) = result {
                    info!("Health check failed: {}", e);
                }
                self.health = None;
            }
        }
        if self.health.is_none() && self.last_health_check.elapsed() >= HEALTH_INTERVAL {
            self.health = Some(self.client.check_health());
            self.last_health_check = Instant::now();
        }
    }

    fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            online: self.client.is_online(),
            demo: self.client.is_demo(),
        }
    }
}

impl eframe::App for ClosetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_health();

        let current = self.router.current();
        let status = self.status();
        let mut navigation = Navigation::None;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            navigation = render_header(ui, current, status);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let page_navigation = self.page.render(ui, &self.client);
            navigation = navigation.clone().or(page_navigation);
        });

        if self.navigate(navigation) {
            let title = format!("Closet - {}", self.router.current().title());
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
            ctx.request_repaint();
        }

        if self.page.is_busy() || self.health.is_some() {
            ctx.request_repaint_after(POLL_INTERVAL);
        } else {
            ctx.request_repaint_after(HEALTH_INTERVAL);
        }
    }
}
