//! Winding-order repair for spherical polygons.
//!
//! Planar tooling tends to wind rings by the RFC 7946 convention, which on
//! the sphere describes the complement of the intended region: a country
//! outline becomes "everything except the country". The transform here
//! re-orients each ring so that outer rings enclose their holes and measure
//! what the author meant.

use std::f64::consts::PI;

use crate::geometry::{Feature, FeatureCollection, Geometry, Position};
use crate::measure::{polygon_contains, ring_area};
use crate::stream::{GeoSink, stream_ring};

/// A [`GeoSink`] transform that buffers each polygon, re-orients rings that
/// enclose the wrong side of the sphere, and forwards everything else
/// untouched.
///
/// Orientation rules, checked per ring with the ring closed:
/// - a hole must contain the first point of its polygon's outer ring;
/// - an outer ring must contain the first point of its first hole;
/// - a hole-free outer ring larger than a hemisphere is reversed only when
///   `simple` is set, since such a ring may be deliberate (an ocean, a wide
///   sensor footprint).
pub struct RewindStream<S> {
    sink: S,
    simple: bool,
    polygon: Option<Vec<Vec<Position>>>,
    ring: Vec<Position>,
}

impl<S: GeoSink> RewindStream<S> {
    pub fn new(sink: S, simple: bool) -> Self {
        Self {
            sink,
            simple,
            polygon: None,
            ring: Vec::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: GeoSink> GeoSink for RewindStream<S> {
    fn point(&mut self, lon: f64, lat: f64) {
        if self.polygon.is_some() {
            self.ring.push([lon, lat]);
        } else {
            self.sink.point(lon, lat);
        }
    }

    fn line_start(&mut self) {
        if self.polygon.is_some() {
            self.ring = Vec::new();
        } else {
            self.sink.line_start();
        }
    }

    fn line_end(&mut self) {
        if let Some(polygon) = &mut self.polygon {
            polygon.push(std::mem::take(&mut self.ring));
        } else {
            self.sink.line_end();
        }
    }

    fn polygon_start(&mut self) {
        self.sink.polygon_start();
        self.polygon = Some(Vec::new());
    }

    fn polygon_end(&mut self) {
        let Some(polygon) = self.polygon.take() else {
            self.sink.polygon_end();
            return;
        };

        // First points survive close-then-reverse, so both anchors can be
        // captured up front.
        let outer_first = polygon.first().and_then(|r| r.first()).copied();
        let hole_first = polygon.get(1).and_then(|r| r.first()).copied();

        for (i, ring) in polygon.into_iter().enumerate() {
            let Some(&first) = ring.first() else {
                self.sink.line_start();
                self.sink.line_end();
                continue;
            };
            let mut ring = ring;
            ring.push(first);

            let reverse = if i > 0 {
                // A hole must contain the first point of its outer ring.
                match outer_first {
                    Some(p) => !polygon_contains(std::slice::from_ref(&ring), p),
                    None => false,
                }
            } else if let Some(p) = hole_first {
                // An outer ring must contain the first point of its first hole.
                !polygon_contains(std::slice::from_ref(&ring), p)
            } else {
                // No holes to anchor on: fall back to the hemisphere rule.
                self.simple && ring_area(&ring) > 2.0 * PI
            };
            if reverse {
                ring.reverse();
            }

            self.sink.line_start();
            for p in &ring[..ring.len() - 1] {
                self.sink.point(p[0], p[1]);
            }
            self.sink.line_end();
        }
        self.sink.polygon_end();
    }

    fn sphere(&mut self) {
        self.sink.sphere();
    }
}

/// Rebuilds polygon rings from streamed events. Sinks receive rings with
/// the closing duplicate dropped, so `line_end` re-closes each ring and the
/// rebuilt geometry serializes as closed GeoJSON rings.
#[derive(Default)]
struct PolygonCollector {
    rings: Vec<Vec<Position>>,
    ring: Vec<Position>,
}

impl GeoSink for PolygonCollector {
    fn point(&mut self, lon: f64, lat: f64) {
        self.ring.push([lon, lat]);
    }

    fn line_start(&mut self) {
        self.ring = Vec::new();
    }

    fn line_end(&mut self) {
        if let Some(&first) = self.ring.first() {
            self.ring.push(first);
        }
        self.rings.push(std::mem::take(&mut self.ring));
    }
}

fn rewind_rings(rings: &[Vec<Position>], simple: bool) -> Vec<Vec<Position>> {
    let mut stream = RewindStream::new(PolygonCollector::default(), simple);
    stream.polygon_start();
    for ring in rings {
        stream_ring(ring, &mut stream);
    }
    stream.polygon_end();
    stream.into_inner().rings
}

/// Returns a copy of `geometry` with polygon rings re-oriented. Non-polygon
/// geometry passes through unchanged.
pub fn rewind_geometry(geometry: &Geometry, simple: bool) -> Geometry {
    match geometry {
        Geometry::Polygon(rings) => Geometry::Polygon(rewind_rings(rings, simple)),
        Geometry::MultiPolygon(polys) => {
            Geometry::MultiPolygon(polys.iter().map(|p| rewind_rings(p, simple)).collect())
        }
        Geometry::GeometryCollection(gs) => {
            Geometry::GeometryCollection(gs.iter().map(|g| rewind_geometry(g, simple)).collect())
        }
        other => other.clone(),
    }
}

pub fn rewind_feature(feature: &Feature, simple: bool) -> Feature {
    Feature {
        id: feature.id.clone(),
        properties: feature.properties.clone(),
        geometry: feature.geometry.as_ref().map(|g| rewind_geometry(g, simple)),
    }
}

pub fn rewind_collection(collection: &FeatureCollection, simple: bool) -> FeatureCollection {
    FeatureCollection {
        features: collection
            .features
            .iter()
            .map(|f| rewind_feature(f, simple))
            .collect(),
    }
}
