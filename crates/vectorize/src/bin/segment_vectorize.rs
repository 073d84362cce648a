//! Demo driver: synthesize a label raster plus bands, run the vectorization
//! pipeline, and write GeoJSON (and optionally the raw statistics tables).
//!
//! Real deployments feed the pipeline from a raster loader and a clustering
//! stage; this binary stands in for both with a blocky synthetic scene so the
//! output can be produced and inspected without any geodata at hand.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use raster_grid::{Band, GeoTransform, LabelGrid};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vectorize::{GeoJsonWriter, JsonStatsWriter, Pipeline};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output GeoJSON path
    #[arg(short, long, default_value = "segments.geojson")]
    output: PathBuf,

    /// Also dump the raw per-label statistics tables as JSON
    #[arg(long)]
    stats_output: Option<PathBuf>,

    /// Synthetic grid rows
    #[arg(long, default_value = "64")]
    rows: usize,

    /// Synthetic grid columns
    #[arg(long, default_value = "64")]
    cols: usize,

    /// Tile size of the synthetic segmentation, in pixels
    #[arg(long, default_value = "16")]
    tile: usize,

    /// Optional Douglas-Peucker tolerance in world units
    #[arg(long)]
    simplify: Option<f64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let (grid, bands) = synthetic_scene(cli.rows, cli.cols, cli.tile)?;
    info!(
        rows = cli.rows,
        cols = cli.cols,
        labels = grid.num_labels(),
        "synthesized label raster"
    );

    let mut builder = Pipeline::builder().with_geo_transform(GeoTransform::default());
    if let Some(tolerance) = cli.simplify {
        builder = builder.with_douglas_peucker(tolerance);
    }
    let pipeline = builder.build();

    let mut writer = GeoJsonWriter::new();
    let summary = match &cli.stats_output {
        Some(path) => {
            let mut stats_writer = JsonStatsWriter::new(path.clone());
            pipeline.process_with_stats(&grid, &bands, &mut writer, &mut stats_writer)?
        }
        None => pipeline.process(&grid, &bands, &mut writer)?,
    };

    writer.save(&cli.output)?;
    info!(
        polygons = summary.polygons_written,
        output = %cli.output.display(),
        "wrote GeoJSON"
    );

    Ok(())
}

/// A tiled segmentation with one label per tile and two bands whose values
/// track the tile id, so per-label means differ and stddevs are small.
fn synthetic_scene(rows: usize, cols: usize, tile: usize) -> Result<(LabelGrid, Vec<Band>)> {
    let tile = tile.max(1);
    let tiles_x = cols.div_ceil(tile);
    let tiles_y = rows.div_ceil(tile);
    let num_labels = (tiles_x * tiles_y) as u32;

    let mut labels = Vec::with_capacity(rows * cols);
    let mut band_a = Vec::with_capacity(rows * cols);
    let mut band_b = Vec::with_capacity(rows * cols);

    for y in 0..rows {
        for x in 0..cols {
            let label = ((y / tile) * tiles_x + x / tile) as u32;
            labels.push(label);
            band_a.push((label % 251) as u8);
            band_b.push(f32::from((label % 97) as u16) * 2.5 + (x % 3) as f32 * 0.1);
        }
    }

    let grid = LabelGrid::new(rows, cols, labels, num_labels)?;
    Ok((grid, vec![Band::U8(band_a), Band::F32(band_b)]))
}
