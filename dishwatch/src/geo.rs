//! Geodesy helpers shared by the GPS and movement components.
//!
//! All functions take positions as `(latitude, longitude)` in decimal degrees
//! and assume a spherical earth. Two distance formulas are provided because
//! the two consumers were tuned against different ones:
//!
//! - [`haversine_m`] - great-circle distance in meters (course/speed derivation)
//! - [`cosine_law_nm`] - spherical law of cosines in nautical miles (movement)

use std::f64::consts::{PI, TAU};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per nautical mile.
pub const METERS_PER_NM: f64 = 1852.0;

/// Nautical miles per degree of great-circle arc.
const NM_PER_DEGREE: f64 = 60.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// A position in decimal degrees.
///
/// Fixes carry no timestamp; their order of arrival is their time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `(latitude, longitude)` as taken by the distance helpers.
    pub fn lat_lon(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// How course over ground is derived from two consecutive fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseMode {
    /// `atan2(Δlon, Δlat)` over raw degree deltas.
    ///
    /// A planar approximation that ignores meridian convergence. Published
    /// course values have always been computed this way, so it is the default.
    #[default]
    Planar,
    /// True great-circle initial bearing.
    GreatCircle,
}

impl std::str::FromStr for CourseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planar" => Ok(Self::Planar),
            "great_circle" | "greatcircle" => Ok(Self::GreatCircle),
            other => Err(format!("unknown course mode '{}'", other)),
        }
    }
}

impl std::fmt::Display for CourseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planar => write!(f, "planar"),
            Self::GreatCircle => write!(f, "great_circle"),
        }
    }
}

/// Great-circle surface distance between two positions, in meters.
///
/// # Example
///
/// ```
/// use dishwatch::geo::haversine_m;
///
/// // One degree of latitude is ~111 km
/// let d = haversine_m((0.0, 0.0), (1.0, 0.0));
/// assert!((d - 111_195.0).abs() < 1.0);
/// ```
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Distance between two positions using the spherical law of cosines, in
/// nautical miles.
///
/// The cosine term is clamped to 1 before `acos` so that identical or nearly
/// identical positions yield 0 instead of NaN.
pub fn cosine_law_nm(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let theta = (lon1 - lon2) * DEG_TO_RAD;

    let cosine = lat1_rad.sin() * lat2_rad.sin() + lat1_rad.cos() * lat2_rad.cos() * theta.cos();
    let arc = cosine.min(1.0).acos();

    arc.to_degrees() * NM_PER_DEGREE
}

/// Course from one fix to the next, in radians within `[0, 2π)`.
pub fn course_rad(from: (f64, f64), to: (f64, f64), mode: CourseMode) -> f64 {
    let raw = match mode {
        CourseMode::Planar => {
            let delta_lat = to.0 - from.0;
            let delta_lon = to.1 - from.1;
            delta_lon.atan2(delta_lat)
        }
        CourseMode::GreatCircle => {
            let lat1_rad = from.0 * DEG_TO_RAD;
            let lat2_rad = to.0 * DEG_TO_RAD;
            let delta_lon = (to.1 - from.1) * DEG_TO_RAD;

            let y = delta_lon.sin() * lat2_rad.cos();
            let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();
            y.atan2(x)
        }
    };

    if raw < 0.0 {
        raw + TAU
    } else {
        raw
    }
}
