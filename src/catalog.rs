//! In-memory catalog of fetched routes.
//!
//! Keeps the backend's order as the insertion order, applies the sidebar
//! text filter, and reorders by proximity only when that mode is on and a
//! viewer position is actually known.

use crate::models::{LatLng, RouteData};
use crate::proximity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteOrdering {
    #[default]
    Insertion,
    Proximity,
}

#[derive(Default)]
pub struct RouteCatalog {
    routes: Vec<RouteData>,
    query: String,
    ordering: RouteOrdering,
}

impl RouteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog contents.
    pub fn set_routes(&mut self, routes: Vec<RouteData>) {
        self.routes = routes;
    }

    pub fn routes(&self) -> &[RouteData] {
        &self.routes
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_lowercase();
    }

    pub fn set_ordering(&mut self, ordering: RouteOrdering) {
        self.ordering = ordering;
    }

    pub fn ordering(&self) -> RouteOrdering {
        self.ordering
    }

    /// The routes to display: filtered by the query, then ordered. With
    /// proximity ordering but no known viewer position, the filtered
    /// insertion order is returned unchanged — never a crash, never a
    /// partial reorder.
    pub fn visible(&self, viewer: Option<LatLng>) -> Vec<RouteData> {
        let mut routes: Vec<RouteData> = self
            .routes
            .iter()
            .filter(|route| matches_query(route, &self.query))
            .cloned()
            .collect();

        if self.ordering == RouteOrdering::Proximity {
            if let Some(viewer) = viewer {
                proximity::rank_by_proximity(&mut routes, viewer);
            }
        }
        routes
    }
}

fn matches_query(route: &RouteData, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    route.from.to_lowercase().contains(query)
        || route.to.to_lowercase().contains(query)
        || route.description.to_lowercase().contains(query)
        || route
            .landmarks
            .iter()
            .any(|landmark| landmark.to_lowercase().contains(query))
}
