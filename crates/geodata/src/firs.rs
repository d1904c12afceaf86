//! Flight information regions: vertical slicing of FIR polygons by flight
//! level.

use spherical::geometry::{Feature, FeatureCollection};

/// Vertical extent of one region, read from feature properties. Units are
/// flight levels (hundreds of feet).
#[derive(Debug, Clone, PartialEq)]
pub struct FirLevels {
    pub designator: String,
    pub lower: f64,
    pub upper: Option<f64>,
}

/// Upper bound assumed for regions that publish no ceiling.
const OPEN_CEILING: f64 = 999.0;

pub fn fir_levels(feature: &Feature) -> FirLevels {
    let get = |key: &str| feature.properties.get(key);
    FirLevels {
        designator: get("designator")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_owned(),
        lower: get("lower").and_then(|v| v.as_f64()).unwrap_or(0.0),
        upper: get("upper").and_then(|v| v.as_f64()),
    }
}

/// Regions whose vertical extent covers the given flight level. The lower
/// bound is inclusive, the ceiling exclusive.
pub fn firs_at_level(collection: &FeatureCollection, level: f64) -> FeatureCollection {
    FeatureCollection {
        features: collection
            .features
            .iter()
            .filter(|f| {
                let levels = fir_levels(f);
                levels.lower <= level && level < levels.upper.unwrap_or(OPEN_CEILING)
            })
            .cloned()
            .collect(),
    }
}
