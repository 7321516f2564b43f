use crate::core::errors::{MlError, Result};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance between two coordinate vectors. Pairs are read as
/// `{latitude, longitude}` in degrees and measured along the great circle,
/// in metres; any other length is measured in Euclidean space.
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(MlError::incompatible_instance(format!(
            "cannot measure distance between {} and {} coordinates",
            a.len(),
            b.len()
        )));
    }
    if a.len() == 2 {
        Ok(haversine(a[0], a[1], b[0], b[1]))
    } else {
        Ok(euclidean(a, b))
    }
}

pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + (d_lon / 2.0).sin().powi(2) * lat1.to_radians().cos() * lat2.to_radians().cos();
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c * 1000.0
}

pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
