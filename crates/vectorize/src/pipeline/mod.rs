pub mod builder;

use raster_grid::{Band, GeoTransform, LabelGrid, validate_bands};
use tracing::{debug, info, warn};

use crate::{
    algorithms::{aggregate, build_rings, douglas_peucker, extract_boundaries, prune_collinear},
    error::Result,
    traits::{PolygonSink, StatsSink},
    types::{Ring, SegmentPolygon, VectorizeSummary, WorldRing},
};

/// Orchestrates the full label-raster-to-polygons run: statistics, boundary
/// extraction, per-label ring stitching and simplification, geo transform,
/// writer handoff.
pub struct Pipeline {
    geo_transform: GeoTransform,
    dp_tolerance: Option<f64>,
}

impl Pipeline {
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(geo_transform: GeoTransform, dp_tolerance: Option<f64>) -> Self {
        Self {
            geo_transform,
            dp_tolerance,
        }
    }

    /// Run the pipeline, handing each finished polygon to `sink`.
    pub fn process(
        &self,
        grid: &LabelGrid,
        bands: &[Band],
        sink: &mut dyn PolygonSink,
    ) -> Result<VectorizeSummary> {
        self.run(grid, bands, sink, None)
    }

    /// Same as [`process`](Self::process), additionally archiving the raw
    /// statistics tables.
    pub fn process_with_stats(
        &self,
        grid: &LabelGrid,
        bands: &[Band],
        sink: &mut dyn PolygonSink,
        stats_sink: &mut dyn StatsSink,
    ) -> Result<VectorizeSummary> {
        self.run(grid, bands, sink, Some(stats_sink))
    }

    fn run(
        &self,
        grid: &LabelGrid,
        bands: &[Band],
        sink: &mut dyn PolygonSink,
        stats_sink: Option<&mut dyn StatsSink>,
    ) -> Result<VectorizeSummary> {
        // structural validation is fatal before any output
        validate_bands(grid, bands)?;

        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            labels = grid.num_labels(),
            bands = bands.len(),
            "vectorizing label raster"
        );

        let table = aggregate(grid, bands);
        if let Some(stats_sink) = stats_sink {
            stats_sink.write_stats(&table)?;
        }

        let boundaries = extract_boundaries(grid);
        debug!(
            edges = boundaries.iter().map(Vec::len).sum::<usize>(),
            "boundary edges extracted"
        );

        let mut summary = VectorizeSummary::default();

        for (label, edges) in boundaries.into_iter().enumerate() {
            let label = label as u32;

            // empty label: defined no-op, nothing reaches the writer
            if edges.is_empty() {
                summary.labels_skipped += 1;
                continue;
            }

            let built = build_rings(edges);
            if !built.open.is_empty() {
                warn!(
                    label,
                    open_rings = built.open.len(),
                    "boundary could not be fully closed; polygon may be incomplete"
                );
                summary.incomplete_labels.push(label);
            }

            let mut world_rings = built
                .closed
                .iter()
                .map(|ring| self.finish_ring(ring))
                .collect::<Vec<_>>();

            if world_rings.is_empty() {
                // only open rings: nothing well-formed to emit for this label
                continue;
            }

            // stitching direction is arbitrary; give the writer the usual
            // convention of a CCW exterior and CW interior rings so ring
            // areas subtract instead of add
            let mut exterior = world_rings.remove(0);
            if signed_area(&exterior) < 0.0 {
                exterior.reverse();
            }
            for ring in &mut world_rings {
                if signed_area(ring) > 0.0 {
                    ring.reverse();
                }
            }

            let polygon = SegmentPolygon {
                label,
                exterior,
                interior_rings: world_rings,
                complete: built.open.is_empty(),
                stats: table.label_stats(label),
            };

            sink.write_polygon(&polygon)?;
            summary.polygons_written += 1;
        }

        info!(
            polygons = summary.polygons_written,
            skipped = summary.labels_skipped,
            incomplete = summary.incomplete_labels.len(),
            "vectorization finished"
        );

        Ok(summary)
    }

    /// Simplify one closed ring and map it to world coordinates.
    fn finish_ring(&self, ring: &Ring) -> WorldRing {
        let simplified = prune_collinear(ring);
        let world: WorldRing = simplified
            .iter()
            .map(|corner| {
                let (x, y) = self.geo_transform.apply(corner.x, corner.y);
                [x, y]
            })
            .collect();

        match self.dp_tolerance {
            Some(tolerance) => douglas_peucker(&world, tolerance),
            None => world,
        }
    }
}

/// Shoelace signed area of a closed ring.
fn signed_area(ring: &WorldRing) -> f64 {
    ring.windows(2)
        .map(|w| w[0][0] * w[1][1] - w[1][0] * w[0][1])
        .sum::<f64>()
        / 2.0
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::VecSink;
    use crate::types::LabelStatsTable;

    fn grid_4x4_split() -> LabelGrid {
        let mut labels = Vec::new();
        for _ in 0..4 {
            labels.extend_from_slice(&[0, 0, 1, 1]);
        }
        LabelGrid::new(4, 4, labels, 2).unwrap()
    }

    #[test]
    fn single_label_grid_yields_outer_rectangle() {
        let grid = LabelGrid::new(4, 4, vec![0; 16], 1).unwrap();
        let bands = vec![Band::U8(vec![5; 16])];
        let pipeline = Pipeline::builder().grid_space().build();
        let mut sink = VecSink::default();

        let summary = pipeline.process(&grid, &bands, &mut sink).unwrap();
        assert_eq!(summary.polygons_written, 1);
        assert!(summary.incomplete_labels.is_empty());

        let poly = &sink.polygons[0];
        assert!(poly.complete);
        // rectangle: 4 corners, closed
        assert_eq!(poly.exterior.len(), 5);
        assert_eq!(poly.exterior[0], *poly.exterior.last().unwrap());
        assert_eq!(poly.area(), 16.0);

        assert_eq!(poly.stats.pixel_count, 16);
        assert_eq!(poly.stats.mean, vec![5.0]);
        assert_eq!(poly.stats.stddev, vec![0.0]);
    }

    #[test]
    fn split_grid_yields_two_rectangles() {
        let grid = grid_4x4_split();
        let bands = vec![Band::U8((0..16).map(|i| i as u8).collect())];
        let pipeline = Pipeline::builder().grid_space().build();
        let mut sink = VecSink::default();

        let summary = pipeline.process(&grid, &bands, &mut sink).unwrap();
        assert_eq!(summary.polygons_written, 2);

        for poly in &sink.polygons {
            assert_eq!(poly.exterior.len(), 5);
            assert_eq!(poly.area(), 8.0);
            assert_eq!(poly.stats.pixel_count, 8);
        }
    }

    #[test]
    fn empty_label_produces_no_polygon() {
        // label 1 never appears
        let grid = LabelGrid::new(2, 2, vec![0, 0, 2, 2], 3).unwrap();
        let bands = vec![Band::U8(vec![1, 2, 3, 4])];
        let pipeline = Pipeline::builder().grid_space().build();
        let mut sink = VecSink::default();

        let summary = pipeline.process(&grid, &bands, &mut sink).unwrap();
        assert_eq!(summary.polygons_written, 2);
        assert_eq!(summary.labels_skipped, 1);
        assert!(sink.polygons.iter().all(|p| p.label != 1));
    }

    #[test]
    fn donut_label_keeps_hole_as_interior_ring() {
        let labels = vec![
            0, 0, 0, //
            0, 1, 0, //
            0, 0, 0, //
        ];
        let grid = LabelGrid::new(3, 3, labels, 2).unwrap();
        let bands = vec![Band::F32(vec![0.5; 9])];
        let pipeline = Pipeline::builder().grid_space().build();
        let mut sink = VecSink::default();

        let summary = pipeline.process(&grid, &bands, &mut sink).unwrap();
        assert_eq!(summary.polygons_written, 2);
        assert!(summary.incomplete_labels.is_empty());

        let donut = sink.polygons.iter().find(|p| p.label == 0).unwrap();
        assert!(donut.complete);
        assert_eq!(donut.interior_rings.len(), 1);
        // 3x3 exterior minus the unit hole
        assert_eq!(donut.area(), 8.0);
    }

    #[test]
    fn band_size_mismatch_is_fatal_before_output() {
        let grid = LabelGrid::new(2, 2, vec![0; 4], 1).unwrap();
        let bands = vec![Band::U8(vec![0; 3])];
        let pipeline = Pipeline::default();
        let mut sink = VecSink::default();

        let err = pipeline.process(&grid, &bands, &mut sink);
        assert!(err.is_err());
        assert!(sink.polygons.is_empty());
    }

    #[test]
    fn geo_transform_maps_ring_vertices() {
        let grid = LabelGrid::new(2, 2, vec![0; 4], 1).unwrap();
        let bands: Vec<Band> = Vec::new();
        let pipeline = Pipeline::builder()
            .with_geo_transform(GeoTransform::new(100.0, 200.0, 10.0, -10.0))
            .build();
        let mut sink = VecSink::default();

        pipeline.process(&grid, &bands, &mut sink).unwrap();
        let poly = &sink.polygons[0];
        assert!(poly.exterior.contains(&[100.0, 200.0]));
        assert!(poly.exterior.contains(&[120.0, 180.0]));
    }

    #[test]
    fn stats_sink_receives_raw_tables() {
        struct Capture(Option<LabelStatsTable>);
        impl StatsSink for Capture {
            fn write_stats(&mut self, table: &LabelStatsTable) -> Result<()> {
                self.0 = Some(table.clone());
                Ok(())
            }
        }

        let grid = grid_4x4_split();
        let bands = vec![Band::U8(vec![3; 16])];
        let pipeline = Pipeline::builder().grid_space().build();
        let mut sink = VecSink::default();
        let mut capture = Capture(None);

        pipeline
            .process_with_stats(&grid, &bands, &mut sink, &mut capture)
            .unwrap();
        let table = capture.0.expect("stats sink should have been invoked");
        assert_eq!(table.num_labels(), 2);
        assert_eq!(table.num_bands(), 1);
        assert_eq!(table.pixel_counts, vec![8, 8]);
    }

    #[test]
    fn mean_round_trips_against_per_label_scan() {
        let grid = grid_4x4_split();
        let band_data: Vec<f64> = (0..16).map(|i| f64::from(i) * 1.25 - 3.0).collect();
        let bands = vec![Band::F64(band_data.clone())];
        let pipeline = Pipeline::builder().grid_space().build();
        let mut sink = VecSink::default();

        pipeline.process(&grid, &bands, &mut sink).unwrap();

        for poly in &sink.polygons {
            let samples: Vec<f64> = (0..grid.len())
                .filter(|&i| grid.as_slice()[i] == poly.label)
                .map(|i| band_data[i])
                .collect();
            let mean = samples.iter().sum::<f64>() / samples.len() as f64;
            let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>()
                / samples.len() as f64;

            let scale = mean.abs().max(1.0);
            assert!((poly.stats.mean[0] - mean).abs() / scale < 1e-9);
            let scale = var.sqrt().abs().max(1.0);
            assert!((poly.stats.stddev[0] - var.sqrt()).abs() / scale < 1e-9);
        }
    }
}
