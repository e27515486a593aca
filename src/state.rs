//! Client-side routes and the navigation history
//!
//! Every page is addressed by a path (`/`, `/items`, `/items/:id`,
//! `/items/:id/edit`, `/add`). Pages ask for navigation by returning a
//! [`Navigation`] command which the [`Router`] applies to its history stack.

use std::fmt;

use closet_core::ItemId;

/// A page of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Items,
    ItemDetail(ItemId),
    EditItem(ItemId),
    AddItem,
}

impl Default for Route {
    fn default() -> Self {
        Self::Dashboard
    }
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Dashboard => "/".to_string(),
            Self::Items => "/items".to_string(),
            Self::ItemDetail(id) => format!("/items/{}", id),
            Self::EditItem(id) => format!("/items/{}/edit", id),
            Self::AddItem => "/add".to_string(),
        }
    }

    /// Parse a path. Unknown paths fall back to the dashboard.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        let id = |raw: &str| raw.parse::<i64>().ok().map(ItemId);

        match segments.as_slice() {
            ["items"] => Self::Items,
            ["add"] => Self::AddItem,
            ["items", raw] => id(*raw).map(Self::ItemDetail).unwrap_or_default(),
            ["items", raw, "edit"] => id(*raw).map(Self::EditItem).unwrap_or_default(),
            _ => Self::Dashboard,
        }
    }

    /// Window title fragment
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Items => "My Closet",
            Self::ItemDetail(_) => "Item",
            Self::EditItem(_) => "Edit Item",
            Self::AddItem => "Add Item",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Stay on the current page
    None,
    /// Open a page on top of the current one (Back returns)
    Push(Route),
    /// Go back to the previous page
    Pop,
    /// Swap the current page for another
    Replace(Route),
}

impl Default for Navigation {
    fn default() -> Self {
        Self::None
    }
}

impl Navigation {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Keep the first requested navigation of a frame
    pub fn or(self, other: Navigation) -> Navigation {
        if self.is_none() {
            other
        } else {
            self
        }
    }
}

/// History stack of visited routes. Never empty.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self { history: vec![start] }
    }

    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or_default()
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Apply a command. Returns whether the current route changed.
    pub fn apply(&mut self, navigation: Navigation) -> bool {
        let before = self.current();
        match navigation {
            Navigation::None => return false,
            Navigation::Push(route) => {
                if route != before {
                    self.history.push(route);
                }
            }
            Navigation::Pop => {
                if self.can_go_back() {
                    self.history.pop();
                }
            }
            Navigation::Replace(route) => {
                self.history.pop();
                // The same route twice in a row collapses into one entry
                if self.history.last() != Some(&route) {
                    self.history.push(route);
                }
            }
        }
        self.current() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_round_trip_through_paths() {
        let routes = [
            Route::Dashboard,
            Route::Items,
            Route::ItemDetail(ItemId(7)),
            Route::EditItem(ItemId(7)),
            Route::AddItem,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_parse_tolerates_trailing_slash_and_unknown_paths() {
        assert_eq!(Route::parse("/items/"), Route::Items);
        assert_eq!(Route::parse("/items/12/edit/"), Route::EditItem(ItemId(12)));
        assert_eq!(Route::parse("/items/abc"), Route::Dashboard);
        assert_eq!(Route::parse("/settings"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
    }

    #[test]
    fn test_push_and_pop() {
        let mut router = Router::default();
        assert!(!router.can_go_back());
        assert!(!router.apply(Navigation::Pop));

        assert!(router.apply(Navigation::Push(Route::Items)));
        assert!(router.apply(Navigation::Push(Route::ItemDetail(ItemId(1)))));
        assert!(!router.apply(Navigation::Push(Route::ItemDetail(ItemId(1)))));
        assert_eq!(router.depth(), 3);

        assert!(router.apply(Navigation::Pop));
        assert_eq!(router.current(), Route::Items);
    }

    #[test]
    fn test_replace_after_edit_returns_to_single_detail_entry() {
        let mut router = Router::default();
        router.apply(Navigation::Push(Route::Items));
        router.apply(Navigation::Push(Route::ItemDetail(ItemId(3))));
        router.apply(Navigation::Push(Route::EditItem(ItemId(3))));

        assert!(router.apply(Navigation::Replace(Route::ItemDetail(ItemId(3)))));
        assert_eq!(router.current(), Route::ItemDetail(ItemId(3)));
        assert_eq!(router.depth(), 3);

        router.apply(Navigation::Pop);
        assert_eq!(router.current(), Route::Items);
    }

    #[test]
    fn test_first_navigation_wins() {
        let nav = Navigation::None
            .or(Navigation::Push(Route::AddItem))
            .or(Navigation::Pop);
        assert_eq!(nav, Navigation::Push(Route::AddItem));
    }
}
