//! Extent fitting: choose scale and translation so a geometry's projected
//! footprint fills a target rectangle.

use spherical::geometry::Geometry;

use crate::transform::Projection;

const BASE_SCALE: f64 = 150.0;

impl Projection {
    /// Fit the geometry inside `[[x0, y0], [x1, y1]]`, preserving aspect
    /// ratio and centering the slack. Rotation is left untouched; an empty
    /// footprint leaves the projection unchanged.
    pub fn fit_extent(&mut self, extent: [[f64; 2]; 2], object: &Geometry) -> &mut Self {
        let saved_scale = self.scale();
        let saved_translate = self.translate();
        self.set_scale(BASE_SCALE).set_translate([0.0, 0.0]);
        let b = self.bounds(object);
        if b.is_empty() || b.width() == 0.0 || b.height() == 0.0 {
            self.set_scale(saved_scale).set_translate(saved_translate);
            return self;
        }
        let w = extent[1][0] - extent[0][0];
        let h = extent[1][1] - extent[0][1];
        let k = (w / b.width()).min(h / b.height());
        let x = extent[0][0] + (w - k * (b.min[0] + b.max[0])) / 2.0;
        let y = extent[0][1] + (h - k * (b.min[1] + b.max[1])) / 2.0;
        self.set_scale(BASE_SCALE * k).set_translate([x, y])
    }

    pub fn fit_size(&mut self, size: [f64; 2], object: &Geometry) -> &mut Self {
        self.fit_extent([[0.0, 0.0], size], object)
    }

    /// Fit to a width, letting the height fall out of the footprint's aspect
    /// ratio. The footprint's top edge lands on y = 0.
    pub fn fit_width(&mut self, width: f64, object: &Geometry) -> &mut Self {
        let saved_scale = self.scale();
        let saved_translate = self.translate();
        self.set_scale(BASE_SCALE).set_translate([0.0, 0.0]);
        let b = self.bounds(object);
        if b.is_empty() || b.width() == 0.0 {
            self.set_scale(saved_scale).set_translate(saved_translate);
            return self;
        }
        let k = width / b.width();
        let x = (width - k * (b.min[0] + b.max[0])) / 2.0;
        let y = -k * b.min[1];
        self.set_scale(BASE_SCALE * k).set_translate([x, y])
    }
}

/// Fit the projection to `width` against the sphere outline and return the
/// matching height in pixels. The scale is nudged down by one part in the
/// smaller dimension so strokes on the outline are not clipped at the frame,
/// and the sampling precision is tightened for crisp arcs at that size.
pub fn fitted_height(projection: &mut Projection, width: f64) -> f64 {
    let outline = Geometry::Sphere;
    projection.fit_width(width, &outline);
    let b = projection.bounds(&outline);
    let dy = b.height().ceil();
    let l = b.width().ceil().min(dy);
    if l > 1.0 {
        let scale = projection.scale();
        projection.set_scale(scale * (l - 1.0) / l);
    }
    projection.set_precision(0.2);
    dy
}
