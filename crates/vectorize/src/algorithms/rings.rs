use crate::types::{Corner, Edge, Ring};

/// Rings stitched from one label's edge set. Closed rings have first == last;
/// open rings are boundaries the greedy chaining could not close and signal a
/// topologically incomplete label.
#[derive(Debug, Clone, Default)]
pub struct BuiltRings {
    pub closed: Vec<Ring>,
    pub open: Vec<Ring>,
}

impl BuiltRings {
    pub fn total_vertices(&self) -> usize {
        self.closed.iter().chain(self.open.iter()).map(Vec::len).sum()
    }
}

/// Stitch an unordered edge multiset into rings by greedy endpoint chaining.
///
/// Edges live in a swap-remove arena; each step scans the remaining edges for
/// one touching the ring's last point and consumes it, appending the far
/// endpoint. When no edge continues the current ring it is finalized as-is
/// and a new ring is seeded from the next remaining edge, until the arena is
/// empty. A label whose pixel set is not simply connected (holes,
/// disconnected components) therefore yields several rings.
///
/// Tie-break: when more than one remaining edge touches the last point (a
/// branch point in the boundary graph, e.g. two regions meeting at a single
/// corner), the first match in the arena's current order wins. This is
/// deterministic for a given input but topology-unaware; branch points are a
/// known limitation, not an error.
pub fn build_rings(mut edges: Vec<Edge>) -> BuiltRings {
    let mut rings = BuiltRings::default();

    while let Some(seed) = pop_first(&mut edges) {
        let mut ring: Ring = vec![seed.start, seed.end];

        loop {
            let last = *ring.last().expect("ring always holds the seed points");
            if last == ring[0] {
                break;
            }

            match find_continuation(&edges, last) {
                Some((i, next_point)) => {
                    edges.swap_remove(i);
                    ring.push(next_point);
                }
                None => break,
            }
        }

        if ring.len() > 2 && ring[0] == *ring.last().expect("non-empty ring") {
            rings.closed.push(ring);
        } else {
            rings.open.push(ring);
        }
    }

    rings
}

fn pop_first(edges: &mut Vec<Edge>) -> Option<Edge> {
    if edges.is_empty() {
        None
    } else {
        Some(edges.swap_remove(0))
    }
}

/// Index of the first edge touching `point`, plus its far endpoint.
fn find_continuation(edges: &[Edge], point: Corner) -> Option<(usize, Corner)> {
    for (i, edge) in edges.iter().enumerate() {
        if edge.start == point {
            return Some((i, edge.end));
        }
        if edge.end == point {
            return Some((i, edge.start));
        }
    }
    None
}
