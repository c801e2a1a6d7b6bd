//! Route listing, editing, and the proposal workflow.

use serde_json::{json, Value};

use crate::models::RouteData;

use super::{BackendClient, BackendError};

impl BackendClient {
    /// All published routes.
    pub async fn list_routes(&self, token: Option<&str>) -> Result<Vec<RouteData>, BackendError> {
        self.request(self.get("route/", token)).await
    }

    /// Text search over routes.
    pub async fn search_routes(
        &self,
        query: &str,
        token: Option<&str>,
    ) -> Result<Vec<RouteData>, BackendError> {
        self.request(self.get(&route_search_path(query), token)).await
    }

    pub async fn get_route(&self, id: &str, token: Option<&str>) -> Result<RouteData, BackendError> {
        self.request(self.get(&format!("route/{id}"), token)).await
    }

    /// Publish a route directly (administrators).
    pub async fn create_route(
        &self,
        route: &RouteData,
        token: Option<&str>,
    ) -> Result<Value, BackendError> {
        self.request_value(self.post("route/", route, token)).await
    }

    /// Submit a route for review (non-administrators).
    pub async fn propose_route(
        &self,
        route: &RouteData,
        token: Option<&str>,
    ) -> Result<Value, BackendError> {
        self.request_value(self.post("route/propose", route, token))
            .await
    }

    pub async fn update_route(
        &self,
        id: &str,
        route: &RouteData,
        token: Option<&str>,
    ) -> Result<Value, BackendError> {
        self.request_value(self.put(&format!("route/{id}"), route, token))
            .await
    }

    /// Proposals awaiting review (administrators).
    pub async fn pending_proposals(
        &self,
        token: Option<&str>,
    ) -> Result<Vec<RouteData>, BackendError> {
        self.request(self.get("route/pending", token)).await
    }

    /// Edit a pending proposal before deciding on it.
    pub async fn update_proposal(
        &self,
        id: &str,
        route: &RouteData,
        token: Option<&str>,
    ) -> Result<Value, BackendError> {
        self.request_value(self.put(&format!("route/pending/{id}"), route, token))
            .await
    }

    pub async fn approve_proposal(
        &self,
        id: &str,
        approved_by: Option<&str>,
        token: Option<&str>,
    ) -> Result<Value, BackendError> {
        let body = json!({ "approvedBy": approved_by });
        self.request_value(self.post(&format!("route/{id}/approve"), &body, token))
            .await
    }

    pub async fn reject_proposal(
        &self,
        id: &str,
        reason: Option<&str>,
        rejected_by: Option<&str>,
        token: Option<&str>,
    ) -> Result<Value, BackendError> {
        let body = json!({ "reason": reason, "rejectedBy": rejected_by });
        self.request_value(self.post(&format!("route/{id}/reject"), &body, token))
            .await
    }

    /// Soft-delete: the backend deactivates the route rather than removing it.
    pub async fn delete_route(&self, id: &str, token: Option<&str>) -> Result<Value, BackendError> {
        let body = json!({ "id": id });
        self.request_value(self.put("route/delete", &body, token))
            .await
    }
}

fn route_search_path(query: &str) -> String {
    format!("route/search?q={}", urlencoding::encode(query))
}
