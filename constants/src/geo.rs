/// Mean Earth radius in metres, matching the value the map layer projects with.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Key resolution for the per-latitude Mercator scale lookup
/// (keys are `round(lat_deg * MERCATOR_LOOKUP_PRECISION)`).
pub const MERCATOR_LOOKUP_PRECISION: f64 = 1000.0;

/// Default step count for the averaged Mercator scale integration.
pub const DEFAULT_SCALE_STEPS: u32 = 50;
