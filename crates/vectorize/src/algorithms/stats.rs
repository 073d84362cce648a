use std::ops::Range;

use rayon::prelude::*;
use raster_grid::{Band, LabelGrid};

use crate::types::LabelStatsTable;

/// Rows per parallel work unit. Partial accumulators are merged in chunk
/// order, so results do not depend on how the pool schedules work.
const ROW_CHUNK: usize = 128;

/// Per-label, per-band pixel count, mean, and standard deviation over the
/// whole grid.
///
/// Three streaming passes: count + sum, mean, squared deviations. Samples are
/// widened to f64 before any arithmetic; the widening is selected once per
/// band by matching the variant, not per pixel. Labels with zero pixels keep
/// mean/stddev at 0.0 and are never divided by — callers skip them at
/// assembly.
pub fn aggregate(grid: &LabelGrid, bands: &[Band]) -> LabelStatsTable {
    let num_labels = grid.num_labels() as usize;
    let num_bands = bands.len();

    let mut pixel_counts = vec![0u32; num_labels];
    let mut sums = vec![vec![0f64; num_labels]; num_bands];

    // pass 1: count + sum
    let partials: Vec<(Vec<u32>, Vec<Vec<f64>>)> = row_chunks(grid.rows())
        .into_par_iter()
        .map(|range| {
            let mut counts = vec![0u32; num_labels];
            let mut sums = vec![vec![0f64; num_labels]; num_bands];

            for y in range.clone() {
                for &label in grid.row(y) {
                    counts[label as usize] += 1;
                }
            }
            for (band, band_sums) in bands.iter().zip(sums.iter_mut()) {
                accumulate_sums(band, grid, range.clone(), band_sums);
            }

            (counts, sums)
        })
        .collect();

    for (counts, chunk_sums) in partials {
        for (total, part) in pixel_counts.iter_mut().zip(counts) {
            *total += part;
        }
        for (band_total, band_part) in sums.iter_mut().zip(chunk_sums) {
            for (total, part) in band_total.iter_mut().zip(band_part) {
                *total += part;
            }
        }
    }

    // pass 2: mean, guarded against empty labels
    let mut mean = vec![vec![0f64; num_labels]; num_bands];
    for (band_mean, band_sums) in mean.iter_mut().zip(&sums) {
        for k in 0..num_labels {
            if pixel_counts[k] > 0 {
                band_mean[k] = band_sums[k] / f64::from(pixel_counts[k]);
            }
        }
    }

    // pass 3: squared deviations, then normalize
    let mut sq_dev = vec![vec![0f64; num_labels]; num_bands];
    let partials: Vec<Vec<Vec<f64>>> = row_chunks(grid.rows())
        .into_par_iter()
        .map(|range| {
            let mut sq = vec![vec![0f64; num_labels]; num_bands];
            for ((band, band_mean), band_sq) in
                bands.iter().zip(&mean).zip(sq.iter_mut())
            {
                accumulate_sq_dev(band, grid, range.clone(), band_mean, band_sq);
            }
            sq
        })
        .collect();

    for chunk_sq in partials {
        for (band_total, band_part) in sq_dev.iter_mut().zip(chunk_sq) {
            for (total, part) in band_total.iter_mut().zip(band_part) {
                *total += part;
            }
        }
    }

    let mut stddev = vec![vec![0f64; num_labels]; num_bands];
    for (band_std, band_sq) in stddev.iter_mut().zip(&sq_dev) {
        for k in 0..num_labels {
            if pixel_counts[k] > 0 {
                band_std[k] = (band_sq[k] / f64::from(pixel_counts[k])).sqrt();
            }
        }
    }

    LabelStatsTable {
        pixel_counts,
        mean,
        stddev,
    }
}

fn row_chunks(rows: usize) -> Vec<Range<usize>> {
    (0..rows)
        .step_by(ROW_CHUNK.max(1))
        .map(|start| start..(start + ROW_CHUNK).min(rows))
        .collect()
}

/// Width dispatch happens here, once per band per chunk.
fn accumulate_sums(band: &Band, grid: &LabelGrid, rows: Range<usize>, sums: &mut [f64]) {
    match band {
        Band::U8(data) => sum_rows(data, grid, rows, sums),
        Band::I8(data) => sum_rows(data, grid, rows, sums),
        Band::U16(data) => sum_rows(data, grid, rows, sums),
        Band::I16(data) => sum_rows(data, grid, rows, sums),
        Band::U32(data) => sum_rows(data, grid, rows, sums),
        Band::I32(data) => sum_rows(data, grid, rows, sums),
        Band::F32(data) => sum_rows(data, grid, rows, sums),
        Band::F64(data) => sum_rows(data, grid, rows, sums),
    }
}

fn accumulate_sq_dev(
    band: &Band,
    grid: &LabelGrid,
    rows: Range<usize>,
    mean: &[f64],
    sq_dev: &mut [f64],
) {
    match band {
        Band::U8(data) => sq_dev_rows(data, grid, rows, mean, sq_dev),
        Band::I8(data) => sq_dev_rows(data, grid, rows, mean, sq_dev),
        Band::U16(data) => sq_dev_rows(data, grid, rows, mean, sq_dev),
        Band::I16(data) => sq_dev_rows(data, grid, rows, mean, sq_dev),
        Band::U32(data) => sq_dev_rows(data, grid, rows, mean, sq_dev),
        Band::I32(data) => sq_dev_rows(data, grid, rows, mean, sq_dev),
        Band::F32(data) => sq_dev_rows(data, grid, rows, mean, sq_dev),
        Band::F64(data) => sq_dev_rows(data, grid, rows, mean, sq_dev),
    }
}

fn sum_rows<T>(data: &[T], grid: &LabelGrid, rows: Range<usize>, sums: &mut [f64])
where
    T: Copy + Into<f64>,
{
    let cols = grid.cols();
    for y in rows {
        let base = y * cols;
        for (sample, &label) in data[base..base + cols].iter().zip(grid.row(y)) {
            sums[label as usize] += (*sample).into();
        }
    }
}

fn sq_dev_rows<T>(data: &[T], grid: &LabelGrid, rows: Range<usize>, mean: &[f64], sq: &mut [f64])
where
    T: Copy + Into<f64>,
{
    let cols = grid.cols();
    for y in rows {
        let base = y * cols;
        for (sample, &label) in data[base..base + cols].iter().zip(grid.row(y)) {
            let d = (*sample).into() - mean[label as usize];
            sq[label as usize] += d * d;
        }
    }
}
