//! Great-circle distance and bounding boxes in nautical miles.

use std::fmt;

use crate::constants::{EARTH_RADIUS_NM, MIN_LON_SCALE, NM_PER_DEGREE};

/// Converts nautical miles to degrees of latitude (approx).
pub fn nm_to_deg(nm: f64) -> f64 {
    nm / NM_PER_DEGREE
}

/// Haversine great-circle distance in nautical miles.
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_NM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Rectangular lat/lon region in degrees.
///
/// Boxes that cross the antimeridian or contain a pole are not split or
/// clamped; the edges simply run past ±180 / ±90.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box covering at least `radius_nm` in every direction from the center.
    pub fn around(lat: f64, lon: f64, radius_nm: f64) -> Self {
        let lat_ext = nm_to_deg(radius_nm);
        // Meridians converge with latitude, so a degree of longitude covers less ground.
        let lon_ext = lat_ext / lat.to_radians().cos().max(MIN_LON_SCALE);
        Self {
            min_lat: lat - lat_ext,
            min_lon: lon - lon_ext,
            max_lat: lat + lat_ext,
            max_lon: lon + lon_ext,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Query form `minLat,minLon,maxLat,maxLon`, four decimal places each.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4},{:.4},{:.4},{:.4}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_are_zero_apart() {
        assert_eq!(distance_nm(45.0, -73.0, 45.0, -73.0), 0.0);
        assert_eq!(distance_nm(-33.9, 151.2, -33.9, 151.2), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = distance_nm(45.47, -73.74, 44.23, -76.6);
        let back = distance_nm(44.23, -76.6, 45.47, -73.74);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_sixty_nm() {
        let d = distance_nm(0.0, 0.0, 1.0, 0.0);
        assert!((d - 60.0).abs() < 0.1, "got {d}");
    }

    #[test]
    fn box_contains_its_center() {
        for &(lat, lon) in &[(45.0, -73.0), (0.0, 0.0), (-60.5, 120.0), (89.99, 10.0)] {
            let bbox = BoundingBox::around(lat, lon, 75.0);
            assert!(bbox.min_lat <= lat && lat <= bbox.max_lat);
            assert!(bbox.min_lon <= lon && lon <= bbox.max_lon);
            assert!(bbox.contains(lat, lon));
        }
    }

    #[test]
    fn longitude_extent_widens_with_latitude() {
        let equator = BoundingBox::around(0.0, 0.0, 60.0);
        assert!((equator.max_lat - 1.0).abs() < 1e-12);
        assert!((equator.max_lon - 1.0).abs() < 1e-12);

        let north = BoundingBox::around(60.0, 0.0, 60.0);
        assert!((north.max_lon - 2.0).abs() < 1e-9);
    }

    #[test]
    fn pole_is_floored_not_infinite() {
        let bbox = BoundingBox::around(90.0, 0.0, 60.0);
        assert!(bbox.max_lon.is_finite());
        assert!((bbox.max_lon - 100.0).abs() < 1e-6);
    }

    #[test]
    fn query_string_uses_four_decimals() {
        let bbox = BoundingBox::around(45.0, -73.0, 75.0);
        assert_eq!(bbox.to_string(), "43.7500,-74.7678,46.2500,-71.2322");
    }
}
