//! # Raster Grid - Shared Raster Data Model
//!
//! Foundational types shared across the segment-kit crates: the label raster
//! produced by an external clustering stage, the numeric bands it was derived
//! from, and the affine transform mapping grid corners to world coordinates.
//!
//! Everything here is a read-only input for the vectorization pipeline. The
//! loader that fills these structures (format decoding, tiled reads) lives
//! outside this workspace; constructors only validate what the pipeline
//! relies on — matching dimensions and in-range labels.
//!
//! ## Example
//!
//! ```rust
//! use raster_grid::{Band, GeoTransform, LabelGrid};
//!
//! let labels = LabelGrid::new(2, 3, vec![0, 0, 1, 0, 1, 1], 2).unwrap();
//! let band = Band::U8(vec![10, 10, 200, 10, 200, 200]);
//! assert_eq!(band.sample_type().name(), "u8");
//! assert_eq!(labels.label_at(1, 2), 1);
//!
//! let gt = GeoTransform::identity();
//! assert_eq!(gt.apply(3, 1), (3.0, 1.0));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for raster grid operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Structural errors in the raster data model. All of these are fatal for a
/// pipeline run: they indicate the upstream loader handed over inconsistent
/// inputs, not a per-label condition.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("label buffer holds {len} values, expected {rows} x {cols} = {expected}")]
    LabelBufferSize {
        len: usize,
        rows: usize,
        cols: usize,
        expected: usize,
    },

    #[error("pixel ({row}, {col}) carries label {label}, outside [0, {num_labels})")]
    LabelOutOfRange {
        row: usize,
        col: usize,
        label: u32,
        num_labels: u32,
    },

    #[error("band {band} buffer holds {len} samples, expected {expected}")]
    BandBufferSize {
        band: usize,
        len: usize,
        expected: usize,
    },

    #[error("unsupported sample type: {name}")]
    UnsupportedSampleType { name: String },
}

/// Dense per-pixel segment assignment, row-major.
///
/// Labels are dense in `[0, num_labels)`; a label with zero pixels is legal
/// and simply contributes nothing downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelGrid {
    rows: usize,
    cols: usize,
    labels: Vec<u32>,
    num_labels: u32,
}

impl LabelGrid {
    /// Build a label grid, validating buffer size and label range.
    pub fn new(rows: usize, cols: usize, labels: Vec<u32>, num_labels: u32) -> Result<Self> {
        let expected = rows * cols;
        if labels.len() != expected {
            return Err(GridError::LabelBufferSize {
                len: labels.len(),
                rows,
                cols,
                expected,
            });
        }

        for (i, &label) in labels.iter().enumerate() {
            if label >= num_labels {
                return Err(GridError::LabelOutOfRange {
                    row: i / cols.max(1),
                    col: i % cols.max(1),
                    label,
                    num_labels,
                });
            }
        }

        Ok(Self {
            rows,
            cols,
            labels,
            num_labels,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn num_labels(&self) -> u32 {
        self.num_labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at a (row, col) position. Panics on out-of-bounds, like slice
    /// indexing; callers iterate within `rows()` x `cols()`.
    #[inline]
    pub fn label_at(&self, row: usize, col: usize) -> u32 {
        self.labels[row * self.cols + col]
    }

    /// One row of labels as a slice, for scanline processing.
    #[inline]
    pub fn row(&self, row: usize) -> &[u32] {
        &self.labels[row * self.cols..(row + 1) * self.cols]
    }

    /// Raw row-major label buffer.
    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }
}

/// Numeric width of a band's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl SampleType {
    pub fn name(&self) -> &'static str {
        match self {
            SampleType::U8 => "u8",
            SampleType::I8 => "i8",
            SampleType::U16 => "u16",
            SampleType::I16 => "i16",
            SampleType::U32 => "u32",
            SampleType::I32 => "i32",
            SampleType::F32 => "f32",
            SampleType::F64 => "f64",
        }
    }

    /// Parse a loader-reported type name. Anything outside the supported set
    /// is a fatal configuration error for the run.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "u8" | "byte" => Ok(SampleType::U8),
            "i8" => Ok(SampleType::I8),
            "u16" => Ok(SampleType::U16),
            "i16" => Ok(SampleType::I16),
            "u32" => Ok(SampleType::U32),
            "i32" => Ok(SampleType::I32),
            "f32" => Ok(SampleType::F32),
            "f64" => Ok(SampleType::F64),
            other => Err(GridError::UnsupportedSampleType {
                name: other.to_string(),
            }),
        }
    }
}

/// One spectral channel, row-major, same dimensions as the label grid.
///
/// Width dispatch happens once per band: consumers match on the variant and
/// run a monomorphized loop over the contained slice, widening each sample to
/// `f64` before any arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Band {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Band {
    pub fn sample_type(&self) -> SampleType {
        match self {
            Band::U8(_) => SampleType::U8,
            Band::I8(_) => SampleType::I8,
            Band::U16(_) => SampleType::U16,
            Band::I16(_) => SampleType::I16,
            Band::U32(_) => SampleType::U32,
            Band::I32(_) => SampleType::I32,
            Band::F32(_) => SampleType::F32,
            Band::F64(_) => SampleType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Band::U8(v) => v.len(),
            Band::I8(v) => v.len(),
            Band::U16(v) => v.len(),
            Band::I16(v) => v.len(),
            Band::U32(v) => v.len(),
            Band::I32(v) => v.len(),
            Band::F32(v) => v.len(),
            Band::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Single sample widened to f64. Per-pixel dispatch — fine for tests and
    /// spot reads; bulk consumers should match on the variant instead.
    #[inline]
    pub fn sample_f64(&self, idx: usize) -> f64 {
        match self {
            Band::U8(v) => f64::from(v[idx]),
            Band::I8(v) => f64::from(v[idx]),
            Band::U16(v) => f64::from(v[idx]),
            Band::I16(v) => f64::from(v[idx]),
            Band::U32(v) => f64::from(v[idx]),
            Band::I32(v) => f64::from(v[idx]),
            Band::F32(v) => f64::from(v[idx]),
            Band::F64(v) => v[idx],
        }
    }
}

/// Affine grid-corner to world-coordinate map: origin plus per-axis pixel
/// size. Applied once per ring vertex immediately before writer handoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_x: f64, pixel_y: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_x,
            pixel_y,
        }
    }

    /// Grid-space passthrough: y grows downward, unit pixels.
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    #[inline]
    pub fn apply(&self, x: u32, y: u32) -> (f64, f64) {
        (
            self.origin_x + self.pixel_x * f64::from(x),
            self.origin_y + self.pixel_y * f64::from(y),
        )
    }
}

impl Default for GeoTransform {
    /// North-up raster convention: unit pixels, y axis pointing down in grid
    /// space maps to decreasing world y.
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

/// Check that every band matches the label grid's geometry. Any mismatch is
/// fatal before processing starts.
pub fn validate_bands(grid: &LabelGrid, bands: &[Band]) -> Result<()> {
    for (i, band) in bands.iter().enumerate() {
        if band.len() != grid.len() {
            return Err(GridError::BandBufferSize {
                band: i,
                len: band.len(),
                expected: grid.len(),
            });
        }
    }
    Ok(())
}
