use crate::models::Coordinate;

/// Earth's radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the Haversine great-circle distance between two points in meters
///
/// Both coordinates must already be within bounds; out-of-range input
/// produces meaningless output rather than an error.
///
/// # Arguments
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
/// Distance in meters, never negative
#[inline]
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Human-readable distance label
///
/// 1000 m and above is shown in kilometers with one decimal,
/// anything closer in whole meters.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate { latitude, longitude }
    }

    #[test]
    fn test_haversine_distance() {
        // Distance from Madrid to Barcelona (approximately 505 km)
        let madrid = coord(40.4168, -3.7038);
        let barcelona = coord(41.3874, 2.1686);

        let distance = haversine_distance(&madrid, &barcelona);
        assert!(
            (distance - 505_000.0).abs() < 10_000.0,
            "Distance should be ~505km, got {}",
            distance
        );
    }

    #[test]
    fn test_identical_points() {
        let sol = coord(40.4169, -3.7035);
        assert_eq!(haversine_distance(&sol, &sol), 0.0);
    }

    #[test]
    fn test_antipodal_points() {
        let distance = haversine_distance(&coord(0.0, 0.0), &coord(0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((distance - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(849.6), "850 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(12_345.0), "12.3 km");
    }
}
