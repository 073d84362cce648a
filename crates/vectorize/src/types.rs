use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// An integer grid-corner coordinate. Pixel `(x, y)` is bounded by corners
/// `(x, y)` through `(x + 1, y + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corner {
    pub x: u32,
    pub y: u32,
}

impl Corner {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// An oriented unit edge between two grid corners, always axis-aligned.
/// Produced by the boundary scan, consumed by ring stitching, never retained
/// past one label's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Corner,
    pub end: Corner,
}

impl Edge {
    pub fn new(sx: u32, sy: u32, ex: u32, ey: u32) -> Self {
        Self {
            start: Corner::new(sx, sy),
            end: Corner::new(ex, ey),
        }
    }
}

/// An ordered sequence of grid corners. Closed when first == last; integer
/// coordinates make the closure test exact.
pub type Ring = Vec<Corner>;

/// A ring mapped through the geo transform, ready for the writer.
pub type WorldRing = Vec<[f64; 2]>;

/// Per-label summary statistics, one mean/stddev pair per band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    pub pixel_count: u32,
    pub mean: Vec<f64>,
    pub stddev: Vec<f64>,
}

/// Full per-label, per-band statistics tables, indexed `[band][label]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelStatsTable {
    pub pixel_counts: Vec<u32>,
    pub mean: Vec<Vec<f64>>,
    pub stddev: Vec<Vec<f64>>,
}

impl LabelStatsTable {
    pub fn num_labels(&self) -> usize {
        self.pixel_counts.len()
    }

    pub fn num_bands(&self) -> usize {
        self.mean.len()
    }

    /// Extract one label's row across all bands.
    pub fn label_stats(&self, label: u32) -> LabelStats {
        let k = label as usize;
        LabelStats {
            pixel_count: self.pixel_counts[k],
            mean: self.mean.iter().map(|band| band[k]).collect(),
            stddev: self.stddev.iter().map(|band| band[k]).collect(),
        }
    }
}

/// Final output unit: one label's simplified boundary in world coordinates
/// plus its statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentPolygon {
    pub label: u32,
    /// Outer boundary ring (first closed ring stitched for this label).
    pub exterior: WorldRing,
    /// Further closed rings: hole boundaries or disconnected components.
    /// The stitcher does not classify containment.
    pub interior_rings: Vec<WorldRing>,
    /// False when the boundary graph left at least one ring unclosed; the
    /// geometry may be topologically incomplete.
    pub complete: bool,
    pub stats: LabelStats,
}

impl SegmentPolygon {
    /// Convert to a geo-types Polygon for geometric operations.
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let exterior = LineString::new(
            self.exterior
                .iter()
                .map(|&[x, y]| Coord { x, y })
                .collect(),
        );

        let interiors: Vec<LineString<f64>> = self
            .interior_rings
            .iter()
            .map(|ring| LineString::new(ring.iter().map(|&[x, y]| Coord { x, y }).collect()))
            .collect();

        Polygon::new(exterior, interiors)
    }

    /// Unsigned area of the exterior minus interior rings.
    pub fn area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().unsigned_area()
    }

    /// Total boundary length across all rings.
    pub fn perimeter(&self) -> f64 {
        let ring_length = |ring: &WorldRing| {
            ring.windows(2)
                .map(|w| {
                    let dx = w[1][0] - w[0][0];
                    let dy = w[1][1] - w[0][1];
                    (dx * dx + dy * dy).sqrt()
                })
                .sum::<f64>()
        };

        ring_length(&self.exterior)
            + self
                .interior_rings
                .iter()
                .map(ring_length)
                .sum::<f64>()
    }
}

/// What a pipeline run produced, for the caller's reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorizeSummary {
    pub polygons_written: usize,
    /// Labels with zero boundary edges (empty pixel sets), skipped entirely.
    pub labels_skipped: usize,
    /// Labels whose boundary could not be fully closed.
    pub incomplete_labels: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> SegmentPolygon {
        SegmentPolygon {
            label: 0,
            exterior: vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]],
            interior_rings: vec![],
            complete: true,
            stats: LabelStats {
                pixel_count: 4,
                mean: vec![1.0],
                stddev: vec![0.0],
            },
        }
    }

    #[test]
    fn polygon_area_and_perimeter() {
        let poly = unit_square();
        assert_eq!(poly.area(), 4.0);
        assert_eq!(poly.perimeter(), 8.0);
    }

    #[test]
    fn area_subtracts_interior_rings() {
        let mut poly = unit_square();
        poly.exterior = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]];
        poly.interior_rings = vec![vec![
            [1.0, 1.0],
            [1.0, 2.0],
            [2.0, 2.0],
            [2.0, 1.0],
            [1.0, 1.0],
        ]];
        assert_eq!(poly.area(), 15.0);
    }

    #[test]
    fn stats_table_extracts_label_row() {
        let table = LabelStatsTable {
            pixel_counts: vec![3, 5],
            mean: vec![vec![1.0, 2.0], vec![10.0, 20.0]],
            stddev: vec![vec![0.5, 0.6], vec![5.0, 6.0]],
        };
        let stats = table.label_stats(1);
        assert_eq!(stats.pixel_count, 5);
        assert_eq!(stats.mean, vec![2.0, 20.0]);
        assert_eq!(stats.stddev, vec![0.6, 6.0]);
    }
}
