//! Wire types shared with the route backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinate, WGS84 degrees. No range validation is applied;
/// out-of-range values flow into the distance math unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Transport kind of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Taxi,
    Bus,
    Calafia,
    /// Used when the backend sends a kind this build does not know
    #[serde(other)]
    Unknown,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Taxi => "taxi",
            TransportKind::Bus => "bus",
            TransportKind::Calafia => "calafia",
            TransportKind::Unknown => "unknown",
        }
    }
}

/// Service hours of a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub start: String,
    pub end: String,
}

/// Audit stamp on edited records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStamp {
    pub user: String,
    pub date: String,
}

/// Route geometry as the backend sends it: either a GeoJSON LineString
/// object or a bare list of `[lat, lon]` pairs. Both normalize to the same
/// ordered point list; index 0 is the boarding start, the last index the
/// end, and the order is the travel direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutePath {
    /// GeoJSON coordinates are `[lon, lat]`.
    LineString {
        #[serde(rename = "type")]
        kind: String,
        coordinates: Vec<[f64; 2]>,
    },
    /// Bare pairs are `[lat, lon]`.
    Pairs(Vec<[f64; 2]>),
}

impl RoutePath {
    /// Points in travel order, as `LatLng` regardless of the wire shape.
    pub fn points(&self) -> Vec<LatLng> {
        match self {
            RoutePath::LineString { coordinates, .. } => coordinates
                .iter()
                .map(|c| LatLng::new(c[1], c[0]))
                .collect(),
            RoutePath::Pairs(pairs) => pairs.iter().map(|c| LatLng::new(c[0], c[1])).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RoutePath::LineString { coordinates, .. } => coordinates.is_empty(),
            RoutePath::Pairs(pairs) => pairs.is_empty(),
        }
    }
}

impl Default for RoutePath {
    fn default() -> Self {
        RoutePath::Pairs(Vec::new())
    }
}

/// A transit route record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteData {
    /// Document id under the backend's native key.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<String>,
    /// Document id under the plain key; some endpoints use one, some the other.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: TransportKind,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path: RoutePath,
    #[serde(default)]
    pub landmarks: Vec<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub updated: Option<UpdateStamp>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RouteData {
    /// The record identifier, whichever key the backend used.
    pub fn route_id(&self) -> Option<&str> {
        self.mongo_id.as_deref().or(self.id.as_deref())
    }
}

/// A role is either a bare identifier (`"admin"`) or an object carrying a
/// display name and the view allow-list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Role {
    Detailed(RoleDetail),
    Name(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDetail {
    #[serde(default)]
    pub name: Option<String>,
    /// View identifiers this role may open.
    #[serde(default)]
    pub routes: Option<Vec<String>>,
}

/// The authenticated user record the backend returns alongside a token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_decodes_geojson_linestring_and_inverts_axes() {
        let json = r#"{"type": "LineString", "coordinates": [[-117.0365, 32.5332], [-117.02, 32.53]]}"#;
        let path: RoutePath = serde_json::from_str(json).unwrap();
        let points = path.points();
        assert_eq!(points.len(), 2);
        // GeoJSON is [lon, lat]; normalized points are lat-first.
        assert_eq!(points[0], LatLng::new(32.5332, -117.0365));
        assert_eq!(points[1], LatLng::new(32.53, -117.02));
    }

    #[test]
    fn path_decodes_bare_pairs_as_lat_lon() {
        let json = "[[32.5332, -117.0365], [32.53, -117.02]]";
        let path: RoutePath = serde_json::from_str(json).unwrap();
        let points = path.points();
        assert_eq!(points[0], LatLng::new(32.5332, -117.0365));
    }

    #[test]
    fn route_record_with_mongo_id() {
        let json = r##"{
            "_id": "abc123",
            "from": "Centro",
            "to": "Playas",
            "type": "calafia",
            "color": "#ff0000",
            "description": "Por Segunda",
            "path": [[32.53, -117.03]],
            "landmarks": ["Catedral"],
            "active": true
        }"##;
        let route: RouteData = serde_json::from_str(json).unwrap();
        assert_eq!(route.route_id(), Some("abc123"));
        assert_eq!(route.kind, TransportKind::Calafia);
        assert_eq!(route.path.points().len(), 1);
    }

    #[test]
    fn route_id_falls_back_to_plain_id() {
        let json = r##"{"id": "r2", "from": "A", "to": "B", "type": "bus", "color": "#000"}"##;
        let route: RouteData = serde_json::from_str(json).unwrap();
        assert_eq!(route.route_id(), Some("r2"));
        assert!(route.path.is_empty());
    }

    #[test]
    fn unknown_transport_kind_does_not_fail() {
        let kind: TransportKind = serde_json::from_str("\"trolebus\"").unwrap();
        assert_eq!(kind, TransportKind::Unknown);
        assert_eq!(kind.as_str(), "unknown");
    }

    #[test]
    fn role_decodes_both_shapes() {
        let bare: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(matches!(bare, Role::Name(ref n) if n == "admin"));

        let detailed: Role = serde_json::from_str(
            r#"{"name": "SUPER ADMINISTRADOR", "routes": ["/home", "/admin-proposals"]}"#,
        )
        .unwrap();
        match detailed {
            Role::Detailed(detail) => {
                assert_eq!(detail.name.as_deref(), Some("SUPER ADMINISTRADOR"));
                assert_eq!(detail.routes.unwrap().len(), 2);
            }
            Role::Name(_) => panic!("expected the object shape"),
        }
    }

    #[test]
    fn user_without_role_decodes() {
        let user: User = serde_json::from_str(r#"{"email": "p@example.com"}"#).unwrap();
        assert!(user.role.is_none());
    }
}
