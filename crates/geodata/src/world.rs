//! Layers derived from a world topology rather than shipped in it.
//!
//! The ocean is the complement of land, and a topology already has
//! everything needed to build it: reversing every land arc flips which side
//! of each coastline is the interior, while reusing the exact same
//! coastline geometry.

use spherical::geometry::{Geometry, Position};
use spherical::measure::ring_area;

use crate::topology::TopoGeometry;

/// Complement a polygonal topology object: every ring is reversed (arc
/// indices complemented, arc order flipped within the ring) and collected
/// into one polygon, so the rings accumulate as one region whose interior
/// is everything the source did not cover. Ring order is preserved.
///
/// Applied to a land object this yields the ocean. Lakes that the source
/// carries as holes in land come out as small filled rings; see
/// [`split_inland_seas`].
pub fn ocean_object(land: &TopoGeometry) -> TopoGeometry {
    fn flip_ring(ring: &[i32]) -> Vec<i32> {
        ring.iter().rev().map(|&ix| !ix).collect()
    }
    let rings: Vec<Vec<i32>> = match land {
        TopoGeometry::Polygon(rings) => rings.iter().map(|r| flip_ring(r)).collect(),
        TopoGeometry::MultiPolygon(polys) => {
            polys.iter().flatten().map(|r| flip_ring(r)).collect()
        }
        other => return other.clone(),
    };
    TopoGeometry::Polygon(rings)
}

/// Split a complemented water polygon into the world ocean and the inland
/// seas. Complemented coastlines wrap more than a hemisphere each; a ring
/// smaller than that (the Caspian, mainly) is a lake that belongs on its
/// own layer rather than inside the ocean polygon.
pub fn split_inland_seas(water: &Geometry) -> (Geometry, Geometry) {
    let rings: Vec<&Vec<Position>> = match water {
        Geometry::Polygon(rings) => rings.iter().collect(),
        Geometry::MultiPolygon(polys) => polys.iter().flatten().collect(),
        _ => return (water.clone(), Geometry::MultiPolygon(Vec::new())),
    };
    let (ocean, inland): (Vec<_>, Vec<_>) = rings
        .into_iter()
        .cloned()
        .partition(|r| ring_area(r) > std::f64::consts::TAU);
    (
        Geometry::Polygon(ocean),
        Geometry::MultiPolygon(inland.into_iter().map(|r| vec![r]).collect()),
    )
}

#[cfg(test)]
mod tests {
    use super::{ocean_object, split_inland_seas};
    use crate::topology::{TopoGeometry, Topology};
    use pretty_assertions::assert_eq;
    use spherical::geometry::Geometry;
    use spherical::measure::{geometry_area, geometry_contains};
    use std::f64::consts::PI;

    /// Two islands; the first carries a lake as a hole.
    fn world() -> Topology {
        Topology::from_str(
            r#"{
              "type": "Topology",
              "arcs": [
                [[0, 0], [0, 30], [30, 30], [30, 0], [0, 0]],
                [[50, 50], [50, 55], [55, 55], [55, 50], [50, 50]],
                [[10, 10], [20, 10], [20, 20], [10, 20], [10, 10]]
              ],
              "objects": {
                "land": {"type": "MultiPolygon", "arcs": [[[0], [2]], [[1]]]}
              }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn ocean_reverses_rings_into_one_polygon() {
        let land = TopoGeometry::MultiPolygon(vec![vec![vec![0], vec![2]], vec![vec![1]]]);
        let ocean = ocean_object(&land);
        // Each ring is complemented in place; ring order is untouched.
        assert_eq!(
            ocean,
            TopoGeometry::Polygon(vec![vec![-1], vec![-3], vec![-2]])
        );
    }

    #[test]
    fn ocean_is_the_complement_of_land() {
        let topo = world();
        let land = topo.objects["land"].geometry.as_ref().unwrap();
        let land_geometry = topo.geometry(land).unwrap();
        let ocean_geometry = topo.geometry(&ocean_object(land)).unwrap();
        let total = geometry_area(&land_geometry) + geometry_area(&ocean_geometry);
        assert!((total - 4.0 * PI).abs() < 1e-9, "total area {total}");
        // Open water yes, island no, lake yes (it is not land).
        assert!(geometry_contains(&ocean_geometry, [-120.0, -40.0]));
        assert!(!geometry_contains(&ocean_geometry, [5.0, 5.0]));
        assert!(geometry_contains(&ocean_geometry, [15.0, 15.0]));
    }

    #[test]
    fn inland_seas_split_off_the_small_rings() {
        let topo = world();
        let land = topo.objects["land"].geometry.as_ref().unwrap();
        let water = topo.geometry(&ocean_object(land)).unwrap();
        let (ocean, inland) = split_inland_seas(&water);
        let Geometry::MultiPolygon(lakes) = &inland else {
            panic!("expected a multipolygon")
        };
        assert_eq!(lakes.len(), 1);
        // The lake ring is the land hole, now a small filled region.
        assert!(geometry_contains(&inland, [15.0, 15.0]));
        assert!(geometry_area(&inland) < 0.1);
        // The remaining ocean excludes both islands but keeps the seas open.
        assert!(geometry_contains(&ocean, [-120.0, -40.0]));
        assert!(!geometry_contains(&ocean, [5.0, 5.0]));
        assert!(!geometry_contains(&ocean, [52.0, 52.0]));
    }
}
