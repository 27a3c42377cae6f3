//! Store locator replies.
//!
//! Each line is `name|distance,longitude,latitude`. Replies come in two
//! flavours: one marks the shopper with a line named exactly `USER`, the
//! other with any name starting with `USER`. Both use the same field order.

use super::ParseError;

/// Map center when the reply carries no user location (Barcelona)
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    latitude: 41.3851,
    longitude: 2.1734,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreLocation {
    pub name: String,
    /// Meters from the shopper; `None` when the reply had no usable distance
    pub distance_meters: Option<f64>,
    pub position: GeoPoint,
}

impl StoreLocation {
    /// `1.2km away`, or `None` when the distance is unknown
    pub fn distance_label(&self) -> Option<String> {
        self.distance_meters
            .map(|meters| format!("{:.1}km away", meters / 1000.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreLocations {
    pub stores: Vec<StoreLocation>,
    pub user_location: Option<GeoPoint>,
}

impl StoreLocations {
    pub fn center(&self) -> GeoPoint {
        self.user_location.unwrap_or(DEFAULT_CENTER)
    }
}

/// How the shopper's own line is recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMarker {
    /// Name is exactly `USER`
    Exact,
    /// Name starts with `USER`
    Prefix,
}

impl UserMarker {
    fn matches(self, name: &str) -> bool {
        match self {
            UserMarker::Exact => name.trim() == "USER",
            UserMarker::Prefix => name.trim_start().starts_with("USER"),
        }
    }
}

pub fn parse_store_locations(text: &str, marker: UserMarker) -> Result<StoreLocations, ParseError> {
    let mut stores = Vec::new();
    let mut user_location = None;

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let Some((name, fields)) = line.split_once('|') else {
            continue;
        };

        let mut fields = fields.split(',').map(str::trim);
        let distance = fields.next().and_then(parse_number);
        let longitude = fields.next().and_then(parse_number);
        let latitude = fields.next().and_then(parse_number);

        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            tracing::warn!(line, "dropping store line with invalid coordinates");
            continue;
        };
        let position = GeoPoint {
            latitude,
            longitude,
        };

        if marker.matches(name) {
            user_location = Some(position);
        } else {
            stores.push(StoreLocation {
                name: name.trim().to_string(),
                distance_meters: distance,
                position,
            });
        }
    }

    Ok(StoreLocations {
        stores,
        user_location,
    })
}

/// Finite float, `NaN` and garbage rejected
fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn user_line_sets_location_and_stores_follow() {
        let result =
            parse_store_locations("USER|0,2.15,41.38\nStoreA|500,2.16,41.39", UserMarker::Exact)
                .unwrap();

        assert_eq!(
            result.user_location,
            Some(GeoPoint {
                latitude: 41.38,
                longitude: 2.15
            })
        );
        assert_eq!(result.stores.len(), 1);
        assert_eq!(result.stores[0].name, "StoreA");
        assert_eq!(result.stores[0].distance_meters, Some(500.0));
        assert_eq!(result.stores[0].distance_label().as_deref(), Some("0.5km away"));
    }

    #[test]
    fn bad_coordinates_are_dropped() {
        let text = "USER|0,2.15,41.38\nBroken|100,abc,41.0\nGood|1500,2.17,41.40\nno pipe here";
        let result = parse_store_locations(text, UserMarker::Exact).unwrap();

        let names: Vec<&str> = result.stores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Good"]);
    }

    #[test]
    fn exact_marker_treats_user_prefixed_names_as_stores() {
        let result = parse_store_locations("USER_HOME|0,2.1,41.3", UserMarker::Exact).unwrap();
        assert_eq!(result.user_location, None);
        assert_eq!(result.stores[0].name, "USER_HOME");
        assert_eq!(result.center(), DEFAULT_CENTER);
    }

    #[test]
    fn prefix_marker_accepts_user_prefixed_names() {
        let text = "USER (you)|NaN,2.15,41.38\nOutlet|NaN,2.2,41.4";
        let result = parse_store_locations(text, UserMarker::Prefix).unwrap();

        assert!(result.user_location.is_some());
        assert_eq!(result.stores[0].distance_meters, None);
        assert_eq!(result.stores[0].distance_label(), None);
    }

    #[test]
    fn nothing_usable_yields_empty_view() {
        let result = parse_store_locations("Prices | sizes, colors", UserMarker::Prefix).unwrap();
        assert!(result.stores.is_empty());
        assert_eq!(result.user_location, None);
    }
}
