//! # Vectorize - Label Raster to Attributed Polygons
//!
//! Turns a dense integer label raster (a per-pixel segment assignment from an
//! external clustering stage) plus co-registered numeric bands into closed
//! polygon boundaries, one per label, each annotated with per-band pixel
//! count, mean, and standard deviation.
//!
//! ## Core Stages
//!
//! - **Boundary extraction**: per label, the unit grid-corner edges
//!   separating its pixels from differently-labeled or out-of-bounds
//!   neighbors ([`algorithms::extract_boundaries`]).
//! - **Ring stitching**: greedy endpoint chaining of the unordered edge set
//!   into closed rings ([`algorithms::build_rings`]).
//! - **Simplification**: exact single-pass collinear-vertex pruning
//!   ([`algorithms::prune_collinear`]), optionally followed by
//!   Douglas-Peucker over world coordinates.
//! - **Statistics**: three-pass streaming count/mean/stddev per label and
//!   band, row-parallel ([`algorithms::aggregate`]).
//!
//! Raster decoding, clustering, and vector-file encoding are external
//! collaborators behind narrow seams: the [`raster_grid`] input types and the
//! [`PolygonSink`] / [`StatsSink`] output traits.
//!
//! ## Quick Start
//!
//! ```rust
//! use raster_grid::{Band, LabelGrid};
//! use vectorize::{GeoJsonWriter, Pipeline};
//!
//! let grid = LabelGrid::new(2, 2, vec![0, 0, 1, 1], 2)?;
//! let bands = vec![Band::U8(vec![10, 12, 200, 202])];
//!
//! let pipeline = Pipeline::builder().grid_space().build();
//! let mut writer = GeoJsonWriter::new();
//! let summary = pipeline.process(&grid, &bands, &mut writer)?;
//! assert_eq!(summary.polygons_written, 2);
//! # Ok::<(), vectorize::VectorizeError>(())
//! ```

pub mod algorithms;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod traits;
pub mod types;

pub use error::{Result, VectorizeError};
pub use io::{GeoJsonWriter, JsonStatsWriter};
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use traits::{PolygonSink, StatsSink, VecSink};
pub use types::{
    Corner, Edge, LabelStats, LabelStatsTable, Ring, SegmentPolygon, VectorizeSummary, WorldRing,
};
