//! The geometry streaming protocol.
//!
//! Geometry is decomposed into a flat sequence of events: points, lines
//! (`line_start`/`point`*/`line_end`), polygons (`polygon_start` framing one
//! line per ring), and the full sphere. Transforms are sinks that forward a
//! rewritten event sequence to a downstream sink, so they compose by
//! wrapping.

use crate::geometry::{Feature, FeatureCollection, Geometry, Position};

pub trait GeoSink {
    fn point(&mut self, lon: f64, lat: f64);
    fn line_start(&mut self) {}
    fn line_end(&mut self) {}
    fn polygon_start(&mut self) {}
    fn polygon_end(&mut self) {}
    fn sphere(&mut self) {}
}

/// Emit one ring as a line. The closing duplicate position, when present,
/// is dropped; sinks treat rings as cyclic.
pub(crate) fn stream_ring(ring: &[Position], sink: &mut impl GeoSink) {
    let n = ring.len();
    let closed = n > 1 && ring[0] == ring[n - 1];
    let stop = if closed { n - 1 } else { n };
    sink.line_start();
    for p in &ring[..stop] {
        sink.point(p[0], p[1]);
    }
    sink.line_end();
}

fn stream_line(line: &[Position], sink: &mut impl GeoSink) {
    sink.line_start();
    for p in line {
        sink.point(p[0], p[1]);
    }
    sink.line_end();
}

fn stream_polygon(rings: &[Vec<Position>], sink: &mut impl GeoSink) {
    sink.polygon_start();
    for ring in rings {
        stream_ring(ring, sink);
    }
    sink.polygon_end();
}

pub fn stream_geometry(geometry: &Geometry, sink: &mut impl GeoSink) {
    match geometry {
        Geometry::Point(p) => sink.point(p[0], p[1]),
        Geometry::MultiPoint(ps) => {
            for p in ps {
                sink.point(p[0], p[1]);
            }
        }
        Geometry::LineString(line) => stream_line(line, sink),
        Geometry::MultiLineString(lines) => {
            for line in lines {
                stream_line(line, sink);
            }
        }
        Geometry::Polygon(rings) => stream_polygon(rings, sink),
        Geometry::MultiPolygon(polys) => {
            for rings in polys {
                stream_polygon(rings, sink);
            }
        }
        Geometry::GeometryCollection(geometries) => {
            for g in geometries {
                stream_geometry(g, sink);
            }
        }
        Geometry::Sphere => sink.sphere(),
    }
}

pub fn stream_feature(feature: &Feature, sink: &mut impl GeoSink) {
    if let Some(g) = &feature.geometry {
        stream_geometry(g, sink);
    }
}

pub fn stream_collection(collection: &FeatureCollection, sink: &mut impl GeoSink) {
    for f in &collection.features {
        stream_feature(f, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoSink, stream_geometry};
    use crate::geometry::Geometry;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl GeoSink for Recorder {
        fn point(&mut self, lon: f64, lat: f64) {
            self.events.push(format!("pt {lon} {lat}"));
        }
        fn line_start(&mut self) {
            self.events.push("ls".into());
        }
        fn line_end(&mut self) {
            self.events.push("le".into());
        }
        fn polygon_start(&mut self) {
            self.events.push("ps".into());
        }
        fn polygon_end(&mut self) {
            self.events.push("pe".into());
        }
        fn sphere(&mut self) {
            self.events.push("sphere".into());
        }
    }

    #[test]
    fn polygon_drops_closing_point() {
        let g = Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 0.0],
        ]]);
        let mut rec = Recorder::default();
        stream_geometry(&g, &mut rec);
        assert_eq!(
            rec.events,
            vec!["ps", "ls", "pt 0 0", "pt 10 0", "pt 10 10", "le", "pe"]
        );
    }

    #[test]
    fn line_string_keeps_every_point() {
        let g = Geometry::LineString(vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        let mut rec = Recorder::default();
        stream_geometry(&g, &mut rec);
        assert_eq!(
            rec.events,
            vec!["ls", "pt 0 0", "pt 1 1", "pt 0 0", "le"]
        );
    }

    #[test]
    fn sphere_is_a_single_event() {
        let mut rec = Recorder::default();
        stream_geometry(&Geometry::Sphere, &mut rec);
        assert_eq!(rec.events, vec!["sphere"]);
    }
}
