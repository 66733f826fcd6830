/// Geographic extent in degrees.
///
/// Longitudes in `[-180, 180]`, latitudes in `[-90, 90]`. An empty extent is
/// represented by inverted infinities so that `extend` works without a
/// sentinel flag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub const WORLD: GeoBounds = GeoBounds {
        min_lon: -180.0,
        min_lat: -90.0,
        max_lon: 180.0,
        max_lat: 90.0,
    };

    pub fn empty() -> Self {
        Self {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    pub fn extend(&mut self, lon_deg: f64, lat_deg: f64) {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return;
        }
        self.min_lon = self.min_lon.min(lon_deg);
        self.min_lat = self.min_lat.min(lat_deg);
        self.max_lon = self.max_lon.max(lon_deg);
        self.max_lat = self.max_lat.max(lat_deg);
    }

    pub fn merge(&mut self, other: &GeoBounds) {
        if other.is_empty() {
            return;
        }
        self.extend(other.min_lon, other.min_lat);
        self.extend(other.max_lon, other.max_lat);
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min_lon + self.max_lon) * 0.5,
            (self.min_lat + self.max_lat) * 0.5,
        ]
    }

    pub fn width(&self) -> f64 {
        (self.max_lon - self.min_lon).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max_lat - self.min_lat).max(0.0)
    }
}
