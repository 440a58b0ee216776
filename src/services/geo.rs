//! Arrival location check against the warehouse coordinate

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::driver::Position;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Outcome of the arrival distance check
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct LocationCheck {
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance to the warehouse, rounded to whole meters
    pub distance_meters: f64,
    pub valid: bool,
}

/// Great-circle distance between two coordinates (haversine)
pub fn haversine_meters(a: Position, b: Position) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Check a driver-reported position against the warehouse location
pub fn check_position(reported: Position, warehouse: Position, max_distance_m: f64) -> LocationCheck {
    let distance = haversine_meters(reported, warehouse).round();
    LocationCheck {
        latitude: reported.latitude,
        longitude: reported.longitude,
        distance_meters: distance,
        valid: distance <= max_distance_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(latitude: f64, longitude: f64) -> Position {
        Position { latitude, longitude }
    }

    #[test]
    fn test_zero_distance() {
        let p = pos(-6.227944, 106.544306);
        assert_eq!(haversine_meters(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere
        let d = haversine_meters(pos(0.0, 0.0), pos(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn test_check_position_flags_validity() {
        let warehouse = pos(-6.227944, 106.544306);
        let nearby = pos(-6.228500, 106.544900);
        let check = check_position(nearby, warehouse, 1000.0);
        assert!(check.valid);
        assert!(check.distance_meters < 1000.0);

        let far = pos(-6.30, 106.70);
        let check = check_position(far, warehouse, 1000.0);
        assert!(!check.valid);
        assert!(check.distance_meters > 10_000.0);
    }
}
