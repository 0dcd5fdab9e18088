use bevy::math::DVec3;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use constants::geo::{EARTH_RADIUS, MERCATOR_LOOKUP_PRECISION};

/// Geographic coordinate as delivered by the embedding map layer.
/// Longitude/latitude in degrees, altitude in metres where known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude: None,
        }
    }

    pub fn with_altitude(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude: Some(altitude),
        }
    }
}

/// Local Mercator distortion factor `1 / cos(lat)` at a latitude in degrees.
pub fn mercator_scale(lat_deg: f64) -> f64 {
    1.0 / lat_deg.to_radians().cos()
}

/// Average the Mercator scale over `steps + 1` evenly spaced latitudes between
/// origin and point (inclusive). A single sample at the origin undershoots the
/// true north-south distance for points far from the origin; the average keeps
/// the error bounded across the whole span.
pub fn average_mercator_scale(origin_lat: f64, point_lat: f64, steps: u32) -> f64 {
    let steps = steps.max(1);
    let lat_step = (point_lat - origin_lat) / steps as f64;

    let mut total = 0.0;
    for i in 0..=steps {
        total += mercator_scale(origin_lat + lat_step * i as f64);
    }
    total / (steps + 1) as f64
}

/// Project a geographic point into metres relative to `origin`.
/// Right-handed, y up: +x east, +z south (map north is -z).
pub fn project(point: &GeoPoint, origin: &GeoPoint, scale_steps: u32) -> DVec3 {
    let avg_scale = average_mercator_scale(origin.latitude, point.latitude, scale_steps);
    project_with_scales(point, origin, mercator_scale(origin.latitude), avg_scale)
}

/// Shared projection core: both the pure path and the memoized resource path
/// feed their scale factors through here.
fn project_with_scales(
    point: &GeoPoint,
    origin: &GeoPoint,
    origin_scale: f64,
    avg_scale: f64,
) -> DVec3 {
    let latitude_diff = (point.latitude - origin.latitude).to_radians();
    let longitude_diff = (point.longitude - origin.longitude).to_radians();
    let altitude_diff = point.altitude.unwrap_or(0.0) - origin.altitude.unwrap_or(0.0);

    let x = longitude_diff * EARTH_RADIUS * origin.latitude.to_radians().cos();
    let y = altitude_diff;
    let z = (-latitude_diff * EARTH_RADIUS / origin_scale) * avg_scale;

    DVec3::new(x, y, z)
}

/// Bit-exact cache key over the four lat/lon inputs. Altitude deltas are cheap
/// and recomputed, so they stay out of the key the same way the map layer's
/// cache leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ProjectionKey {
    point_lat: u64,
    point_lon: u64,
    origin_lat: u64,
    origin_lon: u64,
}

impl ProjectionKey {
    fn new(point: &GeoPoint, origin: &GeoPoint) -> Self {
        Self {
            point_lat: point.latitude.to_bits(),
            point_lon: point.longitude.to_bits(),
            origin_lat: origin.latitude.to_bits(),
            origin_lon: origin.longitude.to_bits(),
        }
    }
}

/// Memoizing projector resource. Both caches live for the whole process;
/// unbounded growth is acceptable at session scale, and access happens only
/// from the main schedule.
#[derive(Resource, Default)]
pub struct GeoProjector {
    results: HashMap<ProjectionKey, DVec3>,
    scale_lookup: HashMap<i64, f64>,
}

impl GeoProjector {
    /// Memoized [`project`]. Repeat clicks on the same coordinate pair skip
    /// the integration loop entirely.
    pub fn project(&mut self, point: &GeoPoint, origin: &GeoPoint, scale_steps: u32) -> DVec3 {
        let key = ProjectionKey::new(point, origin);
        if let Some(cached) = self.results.get(&key) {
            // The key ignores altitude, so the y component is always fresh.
            let altitude = point.altitude.unwrap_or(0.0) - origin.altitude.unwrap_or(0.0);
            return DVec3::new(cached.x, altitude, cached.z);
        }

        let avg_scale = self.average_scale(origin.latitude, point.latitude, scale_steps);
        let origin_scale = self.scale_at(origin.latitude);
        let result = project_with_scales(point, origin, origin_scale, avg_scale);

        self.results.insert(key, result);
        result
    }

    /// Per-latitude scale memo, keyed on latitude rounded to the lookup precision.
    fn scale_at(&mut self, lat_deg: f64) -> f64 {
        let key = (lat_deg * MERCATOR_LOOKUP_PRECISION).round() as i64;
        *self
            .scale_lookup
            .entry(key)
            .or_insert_with(|| mercator_scale(lat_deg))
    }

    fn average_scale(&mut self, origin_lat: f64, point_lat: f64, steps: u32) -> f64 {
        let steps = steps.max(1);
        let lat_step = (point_lat - origin_lat) / steps as f64;

        let mut total = 0.0;
        for i in 0..=steps {
            total += self.scale_at(origin_lat + lat_step * i as f64);
        }
        total / (steps + 1) as f64
    }

    pub fn cached_results(&self) -> usize {
        self.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGA: GeoPoint = GeoPoint {
        longitude: 24.1052,
        latitude: 56.9496,
        altitude: None,
    };

    #[test]
    fn identical_point_and_origin_is_zero_offset() {
        let offset = project(&RIGA, &RIGA, 50);
        assert_eq!(offset.x, 0.0);
        assert_eq!(offset.y, 0.0);
        assert_eq!(offset.z, 0.0);
    }

    #[test]
    fn altitude_delta_passes_straight_through() {
        let point = GeoPoint::with_altitude(RIGA.longitude, RIGA.latitude, 42.5);
        let origin = GeoPoint::with_altitude(RIGA.longitude, RIGA.latitude, 10.0);
        let offset = project(&point, &origin, 50);
        assert_eq!(offset, DVec3::new(0.0, 32.5, 0.0));
    }

    #[test]
    fn east_is_positive_x_north_is_negative_z() {
        let east = GeoPoint::new(RIGA.longitude + 0.01, RIGA.latitude);
        let north = GeoPoint::new(RIGA.longitude, RIGA.latitude + 0.01);

        let east_offset = project(&east, &RIGA, 50);
        assert!(east_offset.x > 0.0);
        assert_eq!(east_offset.z, 0.0);

        let north_offset = project(&north, &RIGA, 50);
        assert_eq!(north_offset.x, 0.0);
        assert!(north_offset.z < 0.0);
    }

    #[test]
    fn longitude_only_projection_negates_exactly_under_swap() {
        // Same latitude on both ends, so the cos(origin latitude) factor is
        // identical and x negates bit-for-bit.
        let point = GeoPoint::new(RIGA.longitude + 0.25, RIGA.latitude);
        let forward = project(&point, &RIGA, 50);
        let backward = project(&RIGA, &point, 50);
        assert_eq!(forward.x, -backward.x);
        assert_eq!(forward.z, -backward.z);
    }

    #[test]
    fn latitude_projection_negates_under_swap_within_scale_drift() {
        // Swapping the roles changes which end anchors the origin scale, so
        // negation holds to the local scale difference rather than exactly.
        let point = GeoPoint::new(RIGA.longitude, RIGA.latitude + 0.05);
        let forward = project(&point, &RIGA, 50);
        let backward = project(&RIGA, &point, 50);
        let relative = (forward.z + backward.z).abs() / forward.z.abs();
        assert!(relative < 1e-3, "relative asymmetry {relative}");
    }

    #[test]
    fn averaged_scale_converges_with_step_count() {
        let far = GeoPoint::new(RIGA.longitude, RIGA.latitude + 1.0);

        let coarse = project(&far, &RIGA, 1_000).z;
        let fine = project(&far, &RIGA, 10_000).z;
        let finer = project(&far, &RIGA, 20_000).z;

        let step_one = (fine - coarse).abs();
        let step_two = (finer - fine).abs();
        assert!(step_two < step_one, "not monotone: {step_one} -> {step_two}");

        let relative = step_two / finer.abs();
        assert!(relative < 1e-6, "relative change {relative}");
    }

    #[test]
    fn averaged_scale_exceeds_origin_scale_going_poleward() {
        // Scale grows with |lat|, so the average over an increasing span must
        // sit strictly between the endpoint scales.
        let avg = average_mercator_scale(50.0, 60.0, 500);
        assert!(avg > mercator_scale(50.0));
        assert!(avg < mercator_scale(60.0));
    }

    #[test]
    fn step_count_is_clamped_to_at_least_one() {
        let far = GeoPoint::new(RIGA.longitude, RIGA.latitude + 1.0);
        let a = project(&far, &RIGA, 0);
        let b = project(&far, &RIGA, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn memoized_projection_matches_pure_projection() {
        let mut projector = GeoProjector::default();
        let point = GeoPoint::new(RIGA.longitude + 0.3, RIGA.latitude - 0.2);

        let cached = projector.project(&point, &RIGA, 50);
        let pure = project(&point, &RIGA, 50);

        // Scale lookup rounds latitudes to 1e-3 degrees, so allow that much
        // drift between the memoized and pure paths.
        assert!((cached - pure).length() < 1.0);

        // Second call must come from the result cache.
        assert_eq!(projector.cached_results(), 1);
        assert_eq!(projector.project(&point, &RIGA, 50), cached);
        assert_eq!(projector.cached_results(), 1);
    }

    #[test]
    fn cached_results_still_track_altitude_changes() {
        let mut projector = GeoProjector::default();
        let ground = GeoPoint::new(RIGA.longitude + 0.1, RIGA.latitude - 0.1);
        let raised = GeoPoint::with_altitude(ground.longitude, ground.latitude, 12.0);

        let first = projector.project(&ground, &RIGA, 50);
        let second = projector.project(&raised, &RIGA, 50);

        // Same lat/lon pair, so the horizontal components come from the one
        // cache entry while y follows the new altitude.
        assert_eq!(projector.cached_results(), 1);
        assert_eq!(second.x, first.x);
        assert_eq!(second.z, first.z);
        assert_eq!(first.y, 0.0);
        assert_eq!(second.y, 12.0);
    }
}
