use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::constants::GEOHASH_PRECISION;
use crate::shared::geohash;

/// Where a complaint was filed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within [-90, 90]"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be within [-180, 180]"))]
    pub longitude: f64,

    /// Geohash of the coordinates; filled in when the client omits it
    #[serde(default)]
    pub geohash: String,
}

impl Location {
    /// Location for coordinates with its geohash computed
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            geohash: geohash::encode(latitude, longitude, GEOHASH_PRECISION),
        }
    }

    pub fn with_geohash(mut self) -> Self {
        if self.geohash.trim().is_empty() {
            self.geohash = geohash::encode(self.latitude, self.longitude, GEOHASH_PRECISION);
        }
        self
    }

    /// Map link used by detail views
    pub fn map_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.latitude, self.longitude
        )
    }
}
