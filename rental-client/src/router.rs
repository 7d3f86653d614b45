//! Route surface and guard

use std::fmt;

use crate::session::SessionStore;

/// Console routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Products,
    AddProduct,
    Members,
    Bookings,
    Support,
    Categories,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Login,
        Route::Dashboard,
        Route::Products,
        Route::AddProduct,
        Route::Members,
        Route::Bookings,
        Route::Support,
        Route::Categories,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Products => "/products",
            Route::AddProduct => "/products/add",
            Route::Members => "/members",
            Route::Bookings => "/bookings",
            Route::Support => "/support",
            Route::Categories => "/categories",
        }
    }

    /// Match a path; a trailing slash is tolerated, anything unknown is `None`
    pub fn parse(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Only the login page is reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// Where a successful login lands
    pub fn landing() -> Route {
        Route::Dashboard
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

/// Gates protected routes behind the session
pub struct RouteGuard;

impl RouteGuard {
    pub fn resolve(route: Route, authenticated: bool) -> RouteDecision {
        if route.is_public() || authenticated {
            RouteDecision::Render(route)
        } else {
            RouteDecision::Redirect(Route::Login)
        }
    }

    /// Resolve a raw path; unmatched paths go to login, no return path is kept
    pub fn resolve_path(path: &str, session: &SessionStore) -> RouteDecision {
        match Route::parse(path) {
            Some(route) => Self::resolve(route, session.is_authenticated()),
            None => RouteDecision::Redirect(Route::Login),
        }
    }
}
