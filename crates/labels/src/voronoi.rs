//! Voronoi-cell label displacement.
//!
//! Each site's cell is the frame rectangle clipped by the perpendicular
//! bisector against every other site. Cells are computed independently,
//! O(n²) over sites, which is comfortably fast for label counts on a map.
//! The label lands on the cell's planar centroid, so crowded sites get
//! pushed apart while lone sites barely move.

use foundation::Aabb2;
use foundation::math::Vec2;

/// Leader line from a site to its displaced label.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Arrow {
    pub site: Vec2,
    pub label: Vec2,
}

/// Clip `polygon` to the half-plane `{p : (p - origin) · normal <= 0}`.
fn clip_half_plane(polygon: &[Vec2], origin: Vec2, normal: Vec2) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let dc = (current - origin).dot(normal);
        let dn = (next - origin).dot(normal);
        if dc <= 0.0 {
            out.push(current);
        }
        if (dc < 0.0) != (dn < 0.0) {
            let t = dc / (dc - dn);
            out.push(current + (next - current).scale(t));
        }
    }
    out
}

/// The Voronoi cell of `sites[index]` clipped to `frame`, as a convex
/// polygon in counterclockwise order. `None` when the site falls outside
/// the frame or coincides with another site.
pub fn voronoi_cell(sites: &[Vec2], index: usize, frame: Aabb2) -> Option<Vec<Vec2>> {
    let site = *sites.get(index)?;
    if !frame.contains([site.x, site.y]) {
        return None;
    }
    let mut cell = vec![
        Vec2::new(frame.min[0], frame.min[1]),
        Vec2::new(frame.max[0], frame.min[1]),
        Vec2::new(frame.max[0], frame.max[1]),
        Vec2::new(frame.min[0], frame.max[1]),
    ];
    for (i, &other) in sites.iter().enumerate() {
        if i == index {
            continue;
        }
        let toward = other - site;
        if toward.length() == 0.0 {
            return None;
        }
        let midpoint = site + toward.scale(0.5);
        cell = clip_half_plane(&cell, midpoint, toward);
        if cell.len() < 3 {
            return None;
        }
    }
    Some(cell)
}

/// Planar centroid of a simple polygon. Degenerate (zero-area) polygons
/// fall back to the vertex average; an empty polygon has no centroid.
pub fn polygon_centroid(polygon: &[Vec2]) -> Option<Vec2> {
    if polygon.is_empty() {
        return None;
    }
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        let cross = a.x * b.y - b.x * a.y;
        area2 += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    if area2.abs() < 1e-12 {
        let n = polygon.len() as f64;
        let sum = polygon
            .iter()
            .fold(Vec2::new(0.0, 0.0), |acc, &p| acc + p);
        return Some(sum.scale(1.0 / n));
    }
    Some(Vec2::new(cx / (3.0 * area2), cy / (3.0 * area2)))
}

/// Displaced label position per site: the centroid of its Voronoi cell, or
/// `None` for sites with no cell in the frame.
pub fn displace(sites: &[Vec2], frame: Aabb2) -> Vec<Option<Vec2>> {
    (0..sites.len())
        .map(|i| voronoi_cell(sites, i, frame).as_deref().and_then(polygon_centroid))
        .collect()
}

/// Leader lines for every site that received a displaced label. The arrow
/// starts on the site and ends on the label.
pub fn label_arrows(sites: &[Vec2], frame: Aabb2) -> Vec<Arrow> {
    sites
        .iter()
        .zip(displace(sites, frame))
        .filter_map(|(&site, label)| label.map(|label| Arrow { site, label }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{displace, label_arrows, polygon_centroid, voronoi_cell};
    use foundation::Aabb2;
    use foundation::math::Vec2;

    fn frame() -> Aabb2 {
        Aabb2::new([0.0, 0.0], [100.0, 100.0])
    }

    fn assert_close(a: Vec2, b: Vec2, eps: f64) {
        assert!((a - b).length() <= eps, "expected {a:?} ~= {b:?}");
    }

    #[test]
    fn lone_site_gets_the_frame_centroid() {
        let sites = vec![Vec2::new(10.0, 10.0)];
        let labels = displace(&sites, frame());
        assert_close(labels[0].unwrap(), Vec2::new(50.0, 50.0), 1e-9);
    }

    #[test]
    fn two_sites_split_the_frame() {
        let sites = vec![Vec2::new(25.0, 50.0), Vec2::new(75.0, 50.0)];
        let labels = displace(&sites, frame());
        assert_close(labels[0].unwrap(), Vec2::new(25.0, 50.0), 1e-9);
        assert_close(labels[1].unwrap(), Vec2::new(75.0, 50.0), 1e-9);
    }

    #[test]
    fn crowded_sites_are_pushed_apart() {
        let sites = vec![Vec2::new(48.0, 50.0), Vec2::new(52.0, 50.0)];
        let labels = displace(&sites, frame());
        let a = labels[0].unwrap();
        let b = labels[1].unwrap();
        assert!(a.x < 48.0, "left label moved left, got {a:?}");
        assert!(b.x > 52.0, "right label moved right, got {b:?}");
        // Displacement is symmetric for a symmetric layout.
        assert_close(a, Vec2::new(100.0 - b.x, b.y), 1e-9);
    }

    #[test]
    fn labels_stay_inside_the_frame() {
        let sites = vec![
            Vec2::new(5.0, 5.0),
            Vec2::new(6.0, 7.0),
            Vec2::new(95.0, 95.0),
            Vec2::new(50.0, 40.0),
            Vec2::new(51.0, 41.0),
        ];
        for label in displace(&sites, frame()).into_iter().flatten() {
            assert!(frame().contains([label.x, label.y]), "escaped: {label:?}");
        }
    }

    #[test]
    fn off_frame_and_duplicate_sites_have_no_cell() {
        let sites = vec![
            Vec2::new(-10.0, 50.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(20.0, 20.0),
        ];
        assert_eq!(voronoi_cell(&sites, 0, frame()), None);
        assert_eq!(voronoi_cell(&sites, 1, frame()), None);
        let labels = displace(&sites, frame());
        assert!(labels.iter().all(Option::is_none));
    }

    #[test]
    fn arrows_anchor_on_their_sites() {
        let sites = vec![Vec2::new(30.0, 30.0), Vec2::new(70.0, 70.0)];
        let arrows = label_arrows(&sites, frame());
        assert_eq!(arrows.len(), 2);
        assert_eq!(arrows[0].site, sites[0]);
        assert_eq!(arrows[1].site, sites[1]);
        assert!((arrows[0].label - arrows[0].site).length() > 0.0);
    }

    #[test]
    fn centroid_of_a_rectangle() {
        let rect = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert_close(polygon_centroid(&rect).unwrap(), Vec2::new(2.0, 1.0), 1e-12);
        assert_eq!(polygon_centroid(&[]), None);
    }
}
