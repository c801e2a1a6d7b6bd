//! Proximity scoring of routes against the viewer's position.
//!
//! Scores a route path by a weighted blend of three distances: to the
//! boarding start (a rider mostly cares about reaching the conventional
//! start), to the nearest point anywhere on the path (the route may pass
//! close enough to board mid-route), and to the far end. The weights sum
//! to 1.0 so the score stays in kilometers.

use crate::models::{LatLng, RouteData};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

const START_WEIGHT: f64 = 0.7;
const NEAREST_POINT_WEIGHT: f64 = 0.2;
const END_WEIGHT: f64 = 0.1;

/// Great-circle distance between two coordinates in kilometers (haversine).
pub fn distance_km(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Weighted distance from the viewer to a route path, in kilometers.
/// An empty path scores infinite so it always sorts last.
pub fn route_score(path: &[LatLng], viewer: LatLng) -> f64 {
    let (Some(start), Some(end)) = (path.first(), path.last()) else {
        return f64::INFINITY;
    };

    let to_start = distance_km(*start, viewer);
    let to_end = distance_km(*end, viewer);
    let nearest = path
        .iter()
        .map(|p| distance_km(*p, viewer))
        .fold(f64::INFINITY, f64::min);

    START_WEIGHT * to_start + NEAREST_POINT_WEIGHT * nearest + END_WEIGHT * to_end
}

/// Distance from the viewer to the boarding start, if the route has a path.
pub fn distance_to_start_km(path: &[LatLng], viewer: LatLng) -> Option<f64> {
    path.first().map(|start| distance_km(*start, viewer))
}

/// Reorder routes ascending by weighted score. The sort is stable: routes
/// with equal scores keep their original order.
pub fn rank_by_proximity(routes: &mut Vec<RouteData>, viewer: LatLng) {
    let mut scored: Vec<(f64, RouteData)> = routes
        .drain(..)
        .map(|route| (route_score(&route.path.points(), viewer), route))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    routes.extend(scored.into_iter().map(|(_, route)| route));
}

/// Display label for the distance to a route's boarding start, e.g.
/// "350 m al inicio" or "2.3 km al inicio". Absent when the path is empty
/// or no viewer position is known.
pub fn start_distance_label(path: &[LatLng], viewer: Option<LatLng>) -> Option<String> {
    let km = distance_to_start_km(path, viewer?)?;
    if km < 1.0 {
        Some(format!("{} m al inicio", (km * 1000.0).round() as i64))
    } else {
        Some(format!("{:.1} km al inicio", km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoutePath, TransportKind};

    // One degree of latitude is ~111.195 km on a 6371 km sphere.
    const KM_PER_DEG_LAT: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

    fn make_route(id: &str, path: Vec<[f64; 2]>) -> RouteData {
        RouteData {
            mongo_id: Some(id.to_string()),
            id: None,
            from: format!("{id}-from"),
            to: format!("{id}-to"),
            kind: TransportKind::Bus,
            schedule: None,
            color: "#3b82f6".to_string(),
            description: String::new(),
            path: RoutePath::Pairs(path),
            landmarks: Vec::new(),
            active: Some(true),
            updated: None,
            created_at: None,
            updated_at: None,
        }
    }

    // --- distance_km ---

    #[test]
    fn distance_is_zero_for_identical_points() {
        let p = LatLng::new(32.52, -117.03);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn distance_is_commutative() {
        let a = LatLng::new(32.5332, -117.0365);
        let b = LatLng::new(32.5050, -116.9750);
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn one_degree_of_latitude_at_equator() {
        let d = distance_km(LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0));
        assert!((d - KM_PER_DEG_LAT).abs() < 0.001, "got {d}");
    }

    // --- route_score ---

    #[test]
    fn empty_path_scores_infinite() {
        let viewer = LatLng::new(32.52, -117.03);
        assert_eq!(route_score(&[], viewer), f64::INFINITY);
    }

    #[test]
    fn single_point_score_equals_plain_distance() {
        // With one point, start, end and nearest coincide and the weights
        // sum to 1.0, so the score is exactly the haversine distance.
        let point = LatLng::new(32.5332, -117.0365);
        let viewer = LatLng::new(32.52, -117.03);
        let score = route_score(&[point], viewer);
        let direct = distance_km(point, viewer);
        assert!((score - direct).abs() < 1e-12, "score {score} vs direct {direct}");
    }

    #[test]
    fn nearer_start_wins_even_when_tail_passes_close() {
        let viewer = LatLng::new(0.0, 0.0);
        // Starts right at the viewer, wanders off.
        let near_start = vec![
            LatLng::new(0.001, 0.0),
            LatLng::new(0.05, 0.0),
            LatLng::new(0.1, 0.0),
        ];
        // Starts far away but passes next to the viewer mid-route.
        let near_middle = vec![
            LatLng::new(0.1, 0.0),
            LatLng::new(0.001, 0.0),
            LatLng::new(0.1, 0.0),
        ];
        assert!(route_score(&near_start, viewer) < route_score(&near_middle, viewer));
    }

    // --- rank_by_proximity ---

    #[test]
    fn ranks_routes_ascending_by_score() {
        let viewer = LatLng::new(32.52, -117.03);
        let route_a = make_route("a", vec![[32.5332, -117.0365], [32.54, -117.05]]);
        let route_b = make_route("b", vec![[32.5050, -116.9750], [32.50, -116.95]]);

        let score_a = route_score(&route_a.path.points(), viewer);
        let score_b = route_score(&route_b.path.points(), viewer);
        assert!(score_a < score_b);

        let mut routes = vec![route_b, route_a];
        rank_by_proximity(&mut routes, viewer);
        assert_eq!(routes[0].route_id(), Some("a"));
        assert_eq!(routes[1].route_id(), Some("b"));
    }

    #[test]
    fn ranking_is_stable_for_equal_scores() {
        let viewer = LatLng::new(32.52, -117.03);
        let path = vec![[32.5332, -117.0365]];
        let mut routes = vec![
            make_route("first", path.clone()),
            make_route("second", path.clone()),
            make_route("third", path),
        ];
        rank_by_proximity(&mut routes, viewer);
        let ids: Vec<_> = routes.iter().filter_map(|r| r.route_id()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn routes_without_a_path_sort_last() {
        let viewer = LatLng::new(32.52, -117.03);
        let mut routes = vec![
            make_route("empty", vec![]),
            make_route("real", vec![[32.53, -117.04]]),
        ];
        rank_by_proximity(&mut routes, viewer);
        assert_eq!(routes[0].route_id(), Some("real"));
        assert_eq!(routes[1].route_id(), Some("empty"));
    }

    // --- start_distance_label ---

    #[test]
    fn label_in_meters_below_one_km() {
        let viewer = LatLng::new(0.0, 0.0);
        // 0.35 km due north of the viewer.
        let start = LatLng::new(0.35 / KM_PER_DEG_LAT, 0.0);
        let label = start_distance_label(&[start], Some(viewer)).unwrap();
        assert_eq!(label, "350 m al inicio");
    }

    #[test]
    fn tiny_distance_rounds_to_one_meter() {
        let viewer = LatLng::new(0.0, 0.0);
        // Half a meter or so: rounds up rather than showing "0 m".
        let start = LatLng::new(0.00051 / KM_PER_DEG_LAT, 0.0);
        let label = start_distance_label(&[start], Some(viewer)).unwrap();
        assert_eq!(label, "1 m al inicio");
    }

    #[test]
    fn label_in_kilometers_with_one_decimal() {
        let viewer = LatLng::new(0.0, 0.0);
        let start = LatLng::new(2.3 / KM_PER_DEG_LAT, 0.0);
        let label = start_distance_label(&[start], Some(viewer)).unwrap();
        assert_eq!(label, "2.3 km al inicio");
    }

    #[test]
    fn label_absent_without_path_or_viewer() {
        let viewer = LatLng::new(32.52, -117.03);
        assert!(start_distance_label(&[], Some(viewer)).is_none());
        assert!(start_distance_label(&[viewer], None).is_none());
    }
}
