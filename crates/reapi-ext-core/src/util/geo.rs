//! Geographic helpers.
//!
//! Coordinates follow GeoJSON axis order: a raw position is `[lng, lat]`.
//! Distances use the haversine formula on a sphere with the mean earth
//! radius.

use rand::Rng;
use serde_json::Value;

use crate::error::{GeoError, GeoResult};

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A resolved longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Position {
    /// Create a position.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Resolve a position from a raw `[lng, lat]` array, a GeoJSON `Point`,
    /// or a GeoJSON `Feature` whose geometry is a `Point`.
    pub fn from_value(value: &Value) -> GeoResult<Self> {
        match value {
            Value::Array(coords) => Self::from_coordinates(coords),
            Value::Object(obj) => match obj.get("type").and_then(Value::as_str) {
                Some("Point") => match obj.get("coordinates") {
                    Some(Value::Array(coords)) => Self::from_coordinates(coords),
                    _ => Err(GeoError::InvalidCoordinate(
                        "Point is missing its coordinates".to_string(),
                    )),
                },
                Some("Feature") => match obj.get("geometry") {
                    Some(geometry)
                        if geometry.get("type").and_then(Value::as_str) == Some("Point") =>
                    {
                        Self::from_value(geometry)
                    }
                    _ => Err(GeoError::InvalidCoordinate(
                        "Feature geometry must be a Point".to_string(),
                    )),
                },
                _ => Err(GeoError::InvalidCoordinate(
                    "expected a GeoJSON Point or Feature".to_string(),
                )),
            },
            other => Err(GeoError::InvalidCoordinate(format!(
                "expected a position, Point or Feature, got {}",
                other
            ))),
        }
    }

    fn from_coordinates(coords: &[Value]) -> GeoResult<Self> {
        // A third element (altitude) is allowed and ignored.
        match coords {
            [lng, lat, ..] => match (lng.as_f64(), lat.as_f64()) {
                (Some(lng), Some(lat)) if lng.is_finite() && lat.is_finite() => {
                    Ok(Self::new(lng, lat))
                }
                _ => Err(GeoError::InvalidCoordinate(
                    "position components must be finite numbers".to_string(),
                )),
            },
            _ => Err(GeoError::InvalidCoordinate(format!(
                "position needs at least 2 components, got {}",
                coords.len()
            ))),
        }
    }
}

/// Great-circle distance in kilometres between two resolved positions.
pub fn distance_between(from: Position, to: Position) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lng / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    c * EARTH_RADIUS_KM
}

/// Great-circle distance in kilometres between two coordinate values.
///
/// Each endpoint may be any shape accepted by [`Position::from_value`].
pub fn distance(from: &Value, to: &Value) -> GeoResult<f64> {
    Ok(distance_between(
        Position::from_value(from)?,
        Position::from_value(to)?,
    ))
}

/// Uniform random integer in `[min, max]`, inclusive on both ends.
pub fn random_int(min: i64, max: i64) -> GeoResult<i64> {
    random_int_with(&mut rand::thread_rng(), min, max)
}

/// [`random_int`] with a caller-supplied generator.
pub fn random_int_with<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> GeoResult<i64> {
    if min > max {
        return Err(GeoError::InvalidRange { min, max });
    }
    Ok(rng.gen_range(min..=max))
}
