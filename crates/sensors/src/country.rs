//! Reverse geocoding of sensor positions to country names, by spherical
//! containment against a world boundaries collection.

use spherical::geometry::FeatureCollection;
use spherical::geometry::Geometry;
use spherical::measure::geometry_contains;
use spherical::rewind::rewind_geometry;

pub struct CountryIndex {
    entries: Vec<(String, Geometry)>,
}

impl CountryIndex {
    /// Index a boundaries collection by the given name property. Country
    /// files in the wild usually follow the planar winding convention, so
    /// rings are repaired on the way in; without that, containment would
    /// match the complement of each country.
    pub fn from_collection(countries: &FeatureCollection, name_property: &str) -> Self {
        let entries = countries
            .features
            .iter()
            .filter_map(|feature| {
                let name = feature
                    .properties
                    .get(name_property)
                    .and_then(|v| v.as_str())?
                    .to_owned();
                let geometry = feature.geometry.as_ref()?;
                Some((name, rewind_geometry(geometry, true)))
            })
            .collect();
        CountryIndex { entries }
    }

    /// The first country containing the point, if any.
    pub fn find(&self, lonlat: [f64; 2]) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, geometry)| geometry_contains(geometry, lonlat))
            .map(|(name, _)| name.as_str())
    }
}
