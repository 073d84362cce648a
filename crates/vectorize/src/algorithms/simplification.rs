use geo_types::{Coord, LineString};

use crate::types::{Ring, WorldRing};

/// Remove vertices collinear with their neighbors in a single left-to-right
/// pass, keeping the first and last vertex and every true corner.
///
/// Collinearity of `(prev, cur, next)` is the zero of the determinant
/// `x1*(y2-y3) + x2*(y3-y1) + x3*(y1-y2)`, evaluated in i64 so the test is
/// exact for grid-corner coordinates. When a vertex is dropped, `prev` stays
/// on the last kept vertex. No fixpoint iteration; on rectilinear rings one
/// pass already reaches the minimal vertex set, making the pass idempotent.
pub fn prune_collinear(ring: &Ring) -> Ring {
    if ring.len() <= 2 {
        return ring.clone();
    }

    let mut out: Ring = Vec::with_capacity(ring.len());
    out.push(ring[0]);
    let mut prev = ring[0];

    for i in 1..ring.len() - 1 {
        let cur = ring[i];
        let next = ring[i + 1];

        let x1 = i64::from(prev.x);
        let y1 = i64::from(prev.y);
        let x2 = i64::from(cur.x);
        let y2 = i64::from(cur.y);
        let x3 = i64::from(next.x);
        let y3 = i64::from(next.y);

        let det = x1 * (y2 - y3) + x2 * (y3 - y1) + x3 * (y1 - y2);
        if det != 0 {
            out.push(cur);
            prev = cur;
        }
    }

    out.push(ring[ring.len() - 1]);
    out
}

/// Optional Douglas-Peucker pass over a world-coordinate ring, using the geo
/// crate's implementation. Off by default in the pipeline; useful when the
/// writer wants coarser geometry than exact pixel staircases.
pub fn douglas_peucker(ring: &WorldRing, tolerance: f64) -> WorldRing {
    use geo::Simplify;

    let line = LineString::new(ring.iter().map(|&[x, y]| Coord { x, y }).collect());
    line.simplify(&tolerance)
        .coords()
        .map(|c| [c.x, c.y])
        .collect()
}
