//! TopoJSON decoding.
//!
//! A topology stores shared arcs once; geometry objects reference them by
//! index, with a negative index `~i` meaning arc `i` traversed backwards.
//! Quantized topologies delta-encode arc points against a scale/translate
//! transform. Arcs are dequantized at parse time, so decoding a geometry is
//! just stitching.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use spherical::geometry::{Feature, FeatureCollection, Geometry, Position};

#[derive(Debug)]
pub enum TopoError {
    NotAnObject,
    NotATopology,
    InvalidTransform,
    InvalidArcs,
    InvalidGeometry(String),
    ArcOutOfRange(i32),
    MissingObject(String),
    Json(serde_json::Error),
}

impl fmt::Display for TopoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopoError::NotAnObject => write!(f, "topology is not a JSON object"),
            TopoError::NotATopology => write!(f, "expected type \"Topology\""),
            TopoError::InvalidTransform => write!(f, "malformed quantization transform"),
            TopoError::InvalidArcs => write!(f, "malformed arcs array"),
            TopoError::InvalidGeometry(kind) => write!(f, "malformed geometry: {kind}"),
            TopoError::ArcOutOfRange(ix) => write!(f, "arc index {ix} out of range"),
            TopoError::MissingObject(name) => write!(f, "no object named {name:?}"),
            TopoError::Json(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl std::error::Error for TopoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TopoError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TopoError {
    fn from(e: serde_json::Error) -> Self {
        TopoError::Json(e)
    }
}

/// A geometry object inside a topology, with arc indices in place of
/// coordinates for line and polygon types.
#[derive(Debug, Clone, PartialEq)]
pub enum TopoGeometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<i32>),
    MultiLineString(Vec<Vec<i32>>),
    Polygon(Vec<Vec<i32>>),
    MultiPolygon(Vec<Vec<Vec<i32>>>),
    Collection(Vec<TopoObject>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopoObject {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Option<TopoGeometry>,
}

struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

impl Transform {
    fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        [
            p[0] * self.scale[0] + self.translate[0],
            p[1] * self.scale[1] + self.translate[1],
        ]
    }
}

#[derive(Debug)]
pub struct Topology {
    arcs: Vec<Vec<Position>>,
    pub objects: BTreeMap<String, TopoObject>,
}

impl Topology {
    pub fn from_str(text: &str) -> Result<Topology, TopoError> {
        Topology::from_value(&serde_json::from_str(text)?)
    }

    pub fn from_value(value: &Value) -> Result<Topology, TopoError> {
        let obj = value.as_object().ok_or(TopoError::NotAnObject)?;
        if obj.get("type").and_then(Value::as_str) != Some("Topology") {
            return Err(TopoError::NotATopology);
        }
        let transform = obj.get("transform").map(parse_transform).transpose()?;
        let arcs = parse_arcs(obj.get("arcs").unwrap_or(&Value::Null), transform.as_ref())?;
        let mut objects = BTreeMap::new();
        if let Some(raw) = obj.get("objects") {
            let raw = raw.as_object().ok_or(TopoError::NotAnObject)?;
            for (name, geometry) in raw {
                objects.insert(name.clone(), parse_object(geometry, transform.as_ref())?);
            }
        }
        Ok(Topology { arcs, objects })
    }

    /// Decode a named object into a feature collection. A geometry
    /// collection yields one feature per child; anything else yields a
    /// single feature.
    pub fn feature(&self, name: &str) -> Result<FeatureCollection, TopoError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| TopoError::MissingObject(name.to_owned()))?;
        self.object_features(object)
    }

    /// Decode an arbitrary topology object, e.g. one derived from another
    /// object's arcs.
    pub fn object_features(&self, object: &TopoObject) -> Result<FeatureCollection, TopoError> {
        let features = match &object.geometry {
            Some(TopoGeometry::Collection(children)) => children
                .iter()
                .map(|child| self.object_feature(child))
                .collect::<Result<_, _>>()?,
            _ => vec![self.object_feature(object)?],
        };
        Ok(FeatureCollection { features })
    }

    fn object_feature(&self, object: &TopoObject) -> Result<Feature, TopoError> {
        Ok(Feature {
            id: object.id.clone(),
            properties: object.properties.clone(),
            geometry: object
                .geometry
                .as_ref()
                .map(|g| self.geometry(g))
                .transpose()?,
        })
    }

    /// Resolve arc indices into coordinates.
    pub fn geometry(&self, topo: &TopoGeometry) -> Result<Geometry, TopoError> {
        Ok(match topo {
            TopoGeometry::Point(p) => Geometry::Point(*p),
            TopoGeometry::MultiPoint(ps) => Geometry::MultiPoint(ps.clone()),
            TopoGeometry::LineString(ixs) => Geometry::LineString(self.stitch(ixs)?),
            TopoGeometry::MultiLineString(lines) => Geometry::MultiLineString(
                lines
                    .iter()
                    .map(|ixs| self.stitch(ixs))
                    .collect::<Result<_, _>>()?,
            ),
            TopoGeometry::Polygon(rings) => Geometry::Polygon(self.rings(rings)?),
            TopoGeometry::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys
                    .iter()
                    .map(|rings| self.rings(rings))
                    .collect::<Result<_, _>>()?,
            ),
            TopoGeometry::Collection(children) => Geometry::GeometryCollection(
                children
                    .iter()
                    .filter_map(|c| c.geometry.as_ref())
                    .map(|g| self.geometry(g))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn rings(&self, rings: &[Vec<i32>]) -> Result<Vec<Vec<Position>>, TopoError> {
        rings.iter().map(|ixs| self.stitch(ixs)).collect()
    }

    /// Join consecutive arcs into one line, dropping the shared endpoint at
    /// each junction.
    fn stitch(&self, indexes: &[i32]) -> Result<Vec<Position>, TopoError> {
        let mut line: Vec<Position> = Vec::new();
        for (n, &ix) in indexes.iter().enumerate() {
            let pos = if ix >= 0 { ix as usize } else { (!ix) as usize };
            let arc = self.arcs.get(pos).ok_or(TopoError::ArcOutOfRange(ix))?;
            if n > 0 {
                line.pop();
            }
            if ix >= 0 {
                line.extend_from_slice(arc);
            } else {
                line.extend(arc.iter().rev().copied());
            }
        }
        Ok(line)
    }
}

fn parse_transform(value: &Value) -> Result<Transform, TopoError> {
    let obj = value.as_object().ok_or(TopoError::InvalidTransform)?;
    let pair = |key: &str| -> Result<[f64; 2], TopoError> {
        let arr = obj
            .get(key)
            .and_then(Value::as_array)
            .ok_or(TopoError::InvalidTransform)?;
        match arr.as_slice() {
            [a, b] => Ok([
                a.as_f64().ok_or(TopoError::InvalidTransform)?,
                b.as_f64().ok_or(TopoError::InvalidTransform)?,
            ]),
            _ => Err(TopoError::InvalidTransform),
        }
    };
    Ok(Transform {
        scale: pair("scale")?,
        translate: pair("translate")?,
    })
}

fn parse_arcs(value: &Value, transform: Option<&Transform>) -> Result<Vec<Vec<Position>>, TopoError> {
    let list = value.as_array().ok_or(TopoError::InvalidArcs)?;
    list.iter()
        .map(|arc| {
            let points = arc.as_array().ok_or(TopoError::InvalidArcs)?;
            let mut out = Vec::with_capacity(points.len());
            let mut acc = [0.0, 0.0];
            for p in points {
                let pair = parse_pair(p).ok_or(TopoError::InvalidArcs)?;
                match transform {
                    Some(t) => {
                        acc[0] += pair[0];
                        acc[1] += pair[1];
                        out.push(t.apply(acc));
                    }
                    None => out.push(pair),
                }
            }
            Ok(out)
        })
        .collect()
}

fn parse_pair(value: &Value) -> Option<[f64; 2]> {
    let arr = value.as_array()?;
    Some([arr.first()?.as_f64()?, arr.get(1)?.as_f64()?])
}

fn parse_point(value: Option<&Value>, transform: Option<&Transform>) -> Result<Position, TopoError> {
    let pair = value
        .and_then(parse_pair)
        .ok_or_else(|| TopoError::InvalidGeometry("Point".to_owned()))?;
    Ok(match transform {
        Some(t) => t.apply(pair),
        None => pair,
    })
}

fn parse_index(value: &Value) -> Result<i32, TopoError> {
    value
        .as_i64()
        .map(|i| i as i32)
        .ok_or_else(|| TopoError::InvalidGeometry("arc index".to_owned()))
}

fn parse_index_list(value: &Value) -> Result<Vec<i32>, TopoError> {
    value
        .as_array()
        .ok_or_else(|| TopoError::InvalidGeometry("arc list".to_owned()))?
        .iter()
        .map(parse_index)
        .collect()
}

fn parse_object(value: &Value, transform: Option<&Transform>) -> Result<TopoObject, TopoError> {
    let obj = value.as_object().ok_or(TopoError::NotAnObject)?;
    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let kind = obj.get("type").and_then(Value::as_str);
    let arcs = || {
        obj.get("arcs")
            .ok_or_else(|| TopoError::InvalidGeometry("missing arcs".to_owned()))
    };
    let nested = |value: &Value| -> Result<Vec<Vec<i32>>, TopoError> {
        value
            .as_array()
            .ok_or_else(|| TopoError::InvalidGeometry("arc list".to_owned()))?
            .iter()
            .map(parse_index_list)
            .collect()
    };

    let geometry = match kind {
        None | Some("") => None,
        Some("Point") => Some(TopoGeometry::Point(parse_point(
            obj.get("coordinates"),
            transform,
        )?)),
        Some("MultiPoint") => {
            let coords = obj
                .get("coordinates")
                .and_then(Value::as_array)
                .ok_or_else(|| TopoError::InvalidGeometry("MultiPoint".to_owned()))?;
            Some(TopoGeometry::MultiPoint(
                coords
                    .iter()
                    .map(|c| parse_point(Some(c), transform))
                    .collect::<Result<_, _>>()?,
            ))
        }
        Some("LineString") => Some(TopoGeometry::LineString(parse_index_list(arcs()?)?)),
        Some("MultiLineString") => Some(TopoGeometry::MultiLineString(nested(arcs()?)?)),
        Some("Polygon") => Some(TopoGeometry::Polygon(nested(arcs()?)?)),
        Some("MultiPolygon") => {
            let polys = arcs()?
                .as_array()
                .ok_or_else(|| TopoError::InvalidGeometry("MultiPolygon".to_owned()))?
                .iter()
                .map(|p| nested(p))
                .collect::<Result<_, _>>()?;
            Some(TopoGeometry::MultiPolygon(polys))
        }
        Some("GeometryCollection") => {
            let children = obj
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| TopoError::InvalidGeometry("GeometryCollection".to_owned()))?
                .iter()
                .map(|g| parse_object(g, transform))
                .collect::<Result<_, _>>()?;
            Some(TopoGeometry::Collection(children))
        }
        Some(other) => {
            return Err(TopoError::InvalidGeometry(other.to_owned()));
        }
    };

    Ok(TopoObject {
        id,
        properties,
        geometry,
    })
}
