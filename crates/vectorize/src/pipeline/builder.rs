use raster_grid::GeoTransform;

use crate::pipeline::Pipeline;

/// Fluent builder for [`Pipeline`].
///
/// The default pipeline uses the north-up geo transform (unit pixels, world y
/// decreasing with grid y) and no extra simplification beyond the exact
/// collinear prune.
pub struct PipelineBuilder {
    geo_transform: GeoTransform,
    dp_tolerance: Option<f64>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            geo_transform: GeoTransform::default(),
            dp_tolerance: None,
        }
    }

    /// Set the affine grid-corner to world map supplied by the geo-referencing
    /// collaborator.
    pub fn with_geo_transform(mut self, geo_transform: GeoTransform) -> Self {
        self.geo_transform = geo_transform;
        self
    }

    /// Keep output in grid coordinates (identity transform). Convenient for
    /// tests and for rasters without geo-referencing.
    pub fn grid_space(mut self) -> Self {
        self.geo_transform = GeoTransform::identity();
        self
    }

    /// Add a Douglas-Peucker pass over the world-coordinate rings after the
    /// collinear prune.
    pub fn with_douglas_peucker(mut self, tolerance: f64) -> Self {
        self.dp_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline::new(self.geo_transform, self.dp_tolerance)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
