//! The configured projection: raw transform + rotation + scale/translate,
//! plus sink adapters for streaming geometry into screen space.

use foundation::Aabb2;
use spherical::geometry::{Geometry, Position};
use spherical::rewind::RewindStream;
use spherical::stream::{GeoSink, stream_geometry};

use crate::raw::ProjectionKind;
use crate::rotation::Rotation;

/// A map projection with the usual knobs. Screen space has y pointing down;
/// `project` flips the raw transform's y-up output accordingly.
#[derive(Clone, Debug)]
pub struct Projection {
    kind: ProjectionKind,
    scale: f64,
    translate: [f64; 2],
    rotate: [f64; 3],
    rotation: Rotation,
    precision: f64,
}

impl Projection {
    pub fn new(kind: ProjectionKind) -> Self {
        Projection {
            kind,
            scale: 150.0,
            translate: [480.0, 250.0],
            rotate: [0.0, 0.0, 0.0],
            rotation: Rotation::identity(),
            precision: 0.5f64.sqrt(),
        }
    }

    pub fn orthographic() -> Self {
        Projection::new(ProjectionKind::Orthographic)
    }

    pub fn azimuthal_equal_area() -> Self {
        Projection::new(ProjectionKind::AzimuthalEqualArea)
    }

    pub fn azimuthal_equidistant() -> Self {
        Projection::new(ProjectionKind::AzimuthalEquidistant)
    }

    pub fn mercator() -> Self {
        Projection::new(ProjectionKind::Mercator)
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn translate(&self) -> [f64; 2] {
        self.translate
    }

    pub fn set_translate(&mut self, translate: [f64; 2]) -> &mut Self {
        self.translate = translate;
        self
    }

    /// Rotation angles `[λ, φ, γ]` in degrees.
    pub fn rotate(&self) -> [f64; 3] {
        self.rotate
    }

    pub fn set_rotate(&mut self, angles: [f64; 3]) -> &mut Self {
        self.rotate = angles;
        self.rotation = Rotation::new(angles);
        self
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn set_precision(&mut self, precision: f64) -> &mut Self {
        self.precision = precision;
        self
    }

    /// Project a `[lon, lat]` degree pair to screen coordinates. `None` when
    /// the point is hidden (orthographic far hemisphere).
    pub fn project(&self, p: Position) -> Option<[f64; 2]> {
        let (lambda, phi) = self.rotation.forward(p[0].to_radians(), p[1].to_radians());
        if self.kind.clips(lambda, phi) {
            return None;
        }
        let [x, y] = self.kind.forward(lambda, phi);
        Some([
            x * self.scale + self.translate[0],
            self.translate[1] - y * self.scale,
        ])
    }

    /// Invert screen coordinates back to `[lon, lat]` degrees. `None` when
    /// the point has no preimage on the sphere.
    pub fn invert(&self, p: [f64; 2]) -> Option<Position> {
        let x = (p[0] - self.translate[0]) / self.scale;
        let y = (self.translate[1] - p[1]) / self.scale;
        let (lambda, phi) = self.kind.invert(x, y)?;
        let (lambda, phi) = self.rotation.invert(lambda, phi);
        Some([lambda.to_degrees(), phi.to_degrees()])
    }

    /// Screen extent of the full sphere under the current scale/translate.
    pub fn sphere_bounds(&self) -> Aabb2 {
        let raw = self.kind.sphere_extent();
        let mut b = Aabb2::empty();
        b.extend([
            raw.min[0] * self.scale + self.translate[0],
            self.translate[1] - raw.max[1] * self.scale,
        ]);
        b.extend([
            raw.max[0] * self.scale + self.translate[0],
            self.translate[1] - raw.min[1] * self.scale,
        ]);
        b
    }

    /// Screen-space bounding box of a geometry's projected vertices. Edges
    /// are not resampled, so arcs bulging past their endpoints (and the
    /// orthographic limb) are measured by their vertices only.
    pub fn bounds(&self, geometry: &Geometry) -> Aabb2 {
        let mut sink = BoundsSink {
            projection: self,
            bounds: Aabb2::empty(),
        };
        stream_geometry(geometry, &mut sink);
        sink.bounds
    }
}

struct BoundsSink<'a> {
    projection: &'a Projection,
    bounds: Aabb2,
}

impl GeoSink for BoundsSink<'_> {
    fn point(&mut self, lon: f64, lat: f64) {
        if let Some(p) = self.projection.project([lon, lat]) {
            self.bounds.extend(p);
        }
    }

    fn sphere(&mut self) {
        let b = self.projection.sphere_bounds();
        self.bounds.extend(b.min);
        self.bounds.extend(b.max);
    }
}

/// A [`GeoSink`] adapter that projects incoming spherical points and forwards
/// them in screen coordinates. Hidden points are dropped, which splits lines
/// crossing the orthographic limb without interpolating the crossing.
pub struct ProjectStream<'a, S> {
    projection: &'a Projection,
    sink: S,
}

impl<'a, S: GeoSink> ProjectStream<'a, S> {
    pub fn new(projection: &'a Projection, sink: S) -> Self {
        ProjectStream { projection, sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: GeoSink> GeoSink for ProjectStream<'_, S> {
    fn point(&mut self, lon: f64, lat: f64) {
        if let Some([x, y]) = self.projection.project([lon, lat]) {
            self.sink.point(x, y);
        }
    }

    fn line_start(&mut self) {
        self.sink.line_start();
    }

    fn line_end(&mut self) {
        self.sink.line_end();
    }

    fn polygon_start(&mut self) {
        self.sink.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.sink.polygon_end();
    }

    fn sphere(&mut self) {
        self.sink.sphere();
    }
}

/// Compose winding repair in front of projection, for sources that follow
/// the planar ring convention. Feed spherical geometry into the returned
/// sink; `sink` receives screen-space events.
pub fn rewound_stream<'a, S: GeoSink>(
    projection: &'a Projection,
    sink: S,
    simple: bool,
) -> RewindStream<ProjectStream<'a, S>> {
    RewindStream::new(ProjectStream::new(projection, sink), simple)
}

#[cfg(test)]
mod tests {
    use super::{Projection, ProjectStream, rewound_stream};
    use spherical::geometry::Geometry;
    use spherical::stream::{GeoSink, stream_geometry};

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b}");
    }

    fn unit(mut p: Projection) -> Projection {
        p.set_scale(1.0).set_translate([0.0, 0.0]);
        p
    }

    #[test]
    fn orthographic_center_and_edge() {
        let p = unit(Projection::orthographic());
        let c = p.project([0.0, 0.0]).unwrap();
        assert_close(c[0], 0.0, 1e-12);
        assert_close(c[1], 0.0, 1e-12);
        let e = p.project([90.0, 0.0]).unwrap();
        assert_close(e[0], 1.0, 1e-12);
        assert_close(e[1], 0.0, 1e-12);
        assert_eq!(p.project([180.0, 0.0]), None);
    }

    #[test]
    fn screen_y_points_down() {
        let p = unit(Projection::orthographic());
        let north = p.project([0.0, 45.0]).unwrap();
        assert!(north[1] < 0.0);
    }

    #[test]
    fn project_invert_round_trip_with_rotation() {
        let mut p = Projection::azimuthal_equal_area();
        p.set_rotate([71.0, -42.0, 11.0])
            .set_scale(320.0)
            .set_translate([400.0, 300.0]);
        for lonlat in [[0.0, 0.0], [-71.0, 42.0], [13.0, 52.5], [151.0, -33.9]] {
            let screen = p.project(lonlat).unwrap();
            let back = p.invert(screen).unwrap();
            assert_close(back[0], lonlat[0], 1e-6);
            assert_close(back[1], lonlat[1], 1e-6);
        }
    }

    #[test]
    fn rotation_recenters() {
        let mut p = unit(Projection::orthographic());
        p.set_rotate([-13.0, -52.5, 0.0]);
        let c = p.project([13.0, 52.5]).unwrap();
        assert_close(c[0], 0.0, 1e-9);
        assert_close(c[1], 0.0, 1e-9);
    }

    #[derive(Default)]
    struct Collect {
        points: Vec<[f64; 2]>,
        lines: usize,
    }

    impl GeoSink for Collect {
        fn point(&mut self, x: f64, y: f64) {
            self.points.push([x, y]);
        }
        fn line_end(&mut self) {
            self.lines += 1;
        }
    }

    #[test]
    fn stream_drops_hidden_points() {
        let p = unit(Projection::orthographic());
        let line = Geometry::LineString(vec![[0.0, 0.0], [45.0, 0.0], [170.0, 0.0]]);
        let mut stream = ProjectStream::new(&p, Collect::default());
        stream_geometry(&line, &mut stream);
        let collected = stream.into_inner();
        assert_eq!(collected.points.len(), 2);
        assert_eq!(collected.lines, 1);
    }

    #[test]
    fn rewound_stream_projects_repaired_rings() {
        // A planar-wound square still projects to the same four vertices;
        // rewinding only changes their order.
        let p = unit(Projection::orthographic());
        let square = Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ]]);
        let mut stream = rewound_stream(&p, Collect::default(), true);
        stream_geometry(&square, &mut stream);
        let collected = stream.into_inner().into_inner();
        assert_eq!(collected.points.len(), 4);
    }

    #[test]
    fn bounds_cover_projected_vertices() {
        let p = unit(Projection::orthographic());
        let line = Geometry::LineString(vec![[0.0, 0.0], [90.0, 0.0], [0.0, 90.0]]);
        let b = p.bounds(&line);
        assert_close(b.min[0], 0.0, 1e-12);
        assert_close(b.max[0], 1.0, 1e-12);
        assert_close(b.min[1], -1.0, 1e-12);
        assert_close(b.max[1], 0.0, 1e-12);
    }

    #[test]
    fn sphere_bounds_follow_scale_and_translate() {
        let mut p = Projection::orthographic();
        p.set_scale(100.0).set_translate([200.0, 150.0]);
        let b = p.bounds(&Geometry::Sphere);
        assert_eq!(b.min, [100.0, 50.0]);
        assert_eq!(b.max, [300.0, 250.0]);
    }
}
