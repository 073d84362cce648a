use rayon::prelude::*;
use raster_grid::LabelGrid;

use crate::types::Edge;

/// Scan the label grid and collect, per label, the unit grid-corner edges
/// separating that label's pixels from differently-labeled or out-of-bounds
/// neighbors.
///
/// Each pixel contributes an edge per exposed side, so a border between two
/// labels appears once in each label's list, oriented with that label's
/// interior on a fixed side. Rows are scanned in parallel; per-row results
/// are merged in row order, so the output edge order is deterministic.
pub fn extract_boundaries(grid: &LabelGrid) -> Vec<Vec<Edge>> {
    let num_labels = grid.num_labels() as usize;
    let mut lists: Vec<Vec<Edge>> = vec![Vec::new(); num_labels];

    if grid.rows() == 0 || grid.cols() == 0 || num_labels == 0 {
        return lists;
    }

    let per_row: Vec<Vec<(u32, Edge)>> = (0..grid.rows())
        .into_par_iter()
        .map(|y| scan_row(grid, y))
        .collect();

    for row_edges in per_row {
        for (label, edge) in row_edges {
            lists[label as usize].push(edge);
        }
    }

    lists
}

fn scan_row(grid: &LabelGrid, y: usize) -> Vec<(u32, Edge)> {
    let cols = grid.cols();
    let rows = grid.rows();
    let row = grid.row(y);
    let yu = y as u32;

    let mut edges = Vec::new();
    for x in 0..cols {
        let label = row[x];
        let xu = x as u32;

        // right side
        if x + 1 == cols || row[x + 1] != label {
            edges.push((label, Edge::new(xu + 1, yu, xu + 1, yu + 1)));
        }
        // left side
        if x == 0 || row[x - 1] != label {
            edges.push((label, Edge::new(xu, yu, xu, yu + 1)));
        }
        // top side
        if y == 0 || grid.label_at(y - 1, x) != label {
            edges.push((label, Edge::new(xu, yu, xu + 1, yu)));
        }
        // bottom side
        if y + 1 == rows || grid.label_at(y + 1, x) != label {
            edges.push((label, Edge::new(xu, yu + 1, xu + 1, yu + 1)));
        }
    }

    edges
}
