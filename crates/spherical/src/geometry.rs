use serde_json::{Map, Value, json};

/// `[lon_deg, lat_deg]`.
pub type Position = [f64; 2];

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<Geometry>),
    /// The whole globe, `{"type": "Sphere"}` by the d3 extension.
    Sphere,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn from_geometry(geometry: Geometry) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry: Some(geometry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug)]
pub enum GeoJsonError {
    NotAnObject,
    MissingType,
    UnknownType(String),
    InvalidCoordinates { geometry: String, reason: String },
    InvalidFeature { index: usize, reason: String },
    Json(serde_json::Error),
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::NotAnObject => write!(f, "expected a JSON object"),
            GeoJsonError::MissingType => write!(f, "object missing \"type\""),
            GeoJsonError::UnknownType(t) => write!(f, "unknown GeoJSON type: {t}"),
            GeoJsonError::InvalidCoordinates { geometry, reason } => {
                write!(f, "invalid {geometry} coordinates: {reason}")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
            GeoJsonError::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for GeoJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoJsonError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GeoJsonError {
    fn from(e: serde_json::Error) -> Self {
        GeoJsonError::Json(e)
    }
}

fn position(value: &Value, geometry: &str) -> Result<Position, GeoJsonError> {
    let arr = value
        .as_array()
        .ok_or_else(|| GeoJsonError::InvalidCoordinates {
            geometry: geometry.to_string(),
            reason: "position must be an array".to_string(),
        })?;
    if arr.len() < 2 {
        return Err(GeoJsonError::InvalidCoordinates {
            geometry: geometry.to_string(),
            reason: format!("position has {} components, need 2", arr.len()),
        });
    }
    let lon = arr[0].as_f64().ok_or_else(|| GeoJsonError::InvalidCoordinates {
        geometry: geometry.to_string(),
        reason: "longitude is not a number".to_string(),
    })?;
    let lat = arr[1].as_f64().ok_or_else(|| GeoJsonError::InvalidCoordinates {
        geometry: geometry.to_string(),
        reason: "latitude is not a number".to_string(),
    })?;
    Ok([lon, lat])
}

fn positions(value: &Value, geometry: &str) -> Result<Vec<Position>, GeoJsonError> {
    value
        .as_array()
        .ok_or_else(|| GeoJsonError::InvalidCoordinates {
            geometry: geometry.to_string(),
            reason: "expected an array of positions".to_string(),
        })?
        .iter()
        .map(|v| position(v, geometry))
        .collect()
}

fn rings(value: &Value, geometry: &str) -> Result<Vec<Vec<Position>>, GeoJsonError> {
    value
        .as_array()
        .ok_or_else(|| GeoJsonError::InvalidCoordinates {
            geometry: geometry.to_string(),
            reason: "expected an array of rings".to_string(),
        })?
        .iter()
        .map(|v| positions(v, geometry))
        .collect()
}

impl Geometry {
    pub fn from_str(payload: &str) -> Result<Self, GeoJsonError> {
        Self::from_value(&serde_json::from_str(payload)?)
    }

    pub fn from_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value.as_object().ok_or(GeoJsonError::NotAnObject)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeoJsonError::MissingType)?;
        if ty == "Sphere" {
            return Ok(Geometry::Sphere);
        }
        if ty == "GeometryCollection" {
            let geometries = obj
                .get("geometries")
                .and_then(|v| v.as_array())
                .ok_or_else(|| GeoJsonError::InvalidCoordinates {
                    geometry: ty.to_string(),
                    reason: "missing geometries".to_string(),
                })?
                .iter()
                .map(Geometry::from_value)
                .collect::<Result<_, _>>()?;
            return Ok(Geometry::GeometryCollection(geometries));
        }

        let coords = obj
            .get("coordinates")
            .ok_or_else(|| GeoJsonError::InvalidCoordinates {
                geometry: ty.to_string(),
                reason: "missing coordinates".to_string(),
            })?;
        match ty {
            "Point" => Ok(Geometry::Point(position(coords, ty)?)),
            "MultiPoint" => Ok(Geometry::MultiPoint(positions(coords, ty)?)),
            "LineString" => Ok(Geometry::LineString(positions(coords, ty)?)),
            "MultiLineString" => Ok(Geometry::MultiLineString(rings(coords, ty)?)),
            "Polygon" => Ok(Geometry::Polygon(rings(coords, ty)?)),
            "MultiPolygon" => {
                let polys = coords
                    .as_array()
                    .ok_or_else(|| GeoJsonError::InvalidCoordinates {
                        geometry: ty.to_string(),
                        reason: "expected an array of polygons".to_string(),
                    })?
                    .iter()
                    .map(|v| rings(v, ty))
                    .collect::<Result<_, _>>()?;
                Ok(Geometry::MultiPolygon(polys))
            }
            other => Err(GeoJsonError::UnknownType(other.to_string())),
        }
    }

    pub fn to_value(&self) -> Value {
        fn pos(p: &Position) -> Value {
            json!([p[0], p[1]])
        }
        fn line(l: &[Position]) -> Value {
            Value::Array(l.iter().map(pos).collect())
        }
        fn poly(p: &[Vec<Position>]) -> Value {
            Value::Array(p.iter().map(|r| line(r)).collect())
        }
        match self {
            Geometry::Point(p) => json!({"type": "Point", "coordinates": pos(p)}),
            Geometry::MultiPoint(ps) => {
                json!({"type": "MultiPoint", "coordinates": line(ps)})
            }
            Geometry::LineString(l) => {
                json!({"type": "LineString", "coordinates": line(l)})
            }
            Geometry::MultiLineString(ls) => {
                json!({"type": "MultiLineString", "coordinates": poly(ls)})
            }
            Geometry::Polygon(p) => json!({"type": "Polygon", "coordinates": poly(p)}),
            Geometry::MultiPolygon(ps) => json!({
                "type": "MultiPolygon",
                "coordinates": Value::Array(ps.iter().map(|p| poly(p)).collect()),
            }),
            Geometry::GeometryCollection(gs) => json!({
                "type": "GeometryCollection",
                "geometries": Value::Array(gs.iter().map(Geometry::to_value).collect()),
            }),
            Geometry::Sphere => json!({"type": "Sphere"}),
        }
    }
}

impl Feature {
    pub fn from_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value.as_object().ok_or(GeoJsonError::NotAnObject)?;
        let id = match obj.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let properties = obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        let geometry = match obj.get("geometry") {
            None | Some(Value::Null) => None,
            Some(g) => Some(Geometry::from_value(g)?),
        };
        Ok(Feature {
            id,
            properties,
            geometry,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), json!("Feature"));
        if let Some(id) = &self.id {
            obj.insert("id".to_string(), json!(id));
        }
        obj.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        obj.insert(
            "geometry".to_string(),
            self.geometry
                .as_ref()
                .map(Geometry::to_value)
                .unwrap_or(Value::Null),
        );
        Value::Object(obj)
    }
}

impl FeatureCollection {
    pub fn from_str(payload: &str) -> Result<Self, GeoJsonError> {
        Self::from_value(&serde_json::from_str(payload)?)
    }

    pub fn from_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value.as_object().ok_or(GeoJsonError::NotAnObject)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeoJsonError::MissingType)?;
        if ty != "FeatureCollection" {
            return Err(GeoJsonError::UnknownType(ty.to_string()));
        }
        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeoJsonError::MissingType)?;
        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat) in features_val.iter().enumerate() {
            features.push(Feature::from_value(feat).map_err(|e| {
                GeoJsonError::InvalidFeature {
                    index,
                    reason: e.to_string(),
                }
            })?);
        }
        Ok(FeatureCollection { features })
    }

    pub fn to_value(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": Value::Array(self.features.iter().map(Feature::to_value).collect()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Feature, FeatureCollection, Geometry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_polygon_with_hole() {
        let g = Geometry::from_value(&json!({
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                [[2.0, 2.0], [2.0, 8.0], [8.0, 8.0], [8.0, 2.0], [2.0, 2.0]]
            ]
        }))
        .unwrap();
        let Geometry::Polygon(rings) = &g else {
            panic!("expected polygon")
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][1], [10.0, 0.0]);
    }

    #[test]
    fn parses_sphere() {
        let g = Geometry::from_value(&json!({"type": "Sphere"})).unwrap();
        assert_eq!(g, Geometry::Sphere);
    }

    #[test]
    fn value_round_trip() {
        let v = json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 0.0]]]]
        });
        let g = Geometry::from_value(&v).unwrap();
        assert_eq!(g.to_value(), v);
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(Geometry::from_value(&json!({"type": "Hexagon", "coordinates": []})).is_err());
    }

    #[test]
    fn parses_feature_collection_with_properties() {
        let fc = FeatureCollection::from_value(&json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 7,
                    "properties": {"name": "test"},
                    "geometry": {"type": "Point", "coordinates": [1.5, 2.5]}
                },
                {"type": "Feature", "properties": null, "geometry": null}
            ]
        }))
        .unwrap();
        assert_eq!(fc.features.len(), 2);
        assert_eq!(fc.features[0].id.as_deref(), Some("7"));
        assert_eq!(
            fc.features[0].properties.get("name"),
            Some(&json!("test"))
        );
        assert_eq!(fc.features[1].geometry, None);
    }

    #[test]
    fn feature_to_value_keeps_null_geometry() {
        let f = Feature {
            id: None,
            properties: Default::default(),
            geometry: None,
        };
        assert_eq!(f.to_value()["geometry"], serde_json::Value::Null);
    }
}
