use crate::{
    error::Result,
    types::{LabelStatsTable, SegmentPolygon},
};

/// Seam to the external vector writer. Receives finished polygons one by one;
/// the pipeline does not retain them after handoff. File-format encoding is
/// entirely the sink's concern.
pub trait PolygonSink: Send {
    fn write_polygon(&mut self, polygon: &SegmentPolygon) -> Result<()>;
}

/// Optional seam for archiving the raw statistics tables independent of
/// geometry.
pub trait StatsSink: Send {
    fn write_stats(&mut self, table: &LabelStatsTable) -> Result<()>;
}

/// Collect polygons in memory. Handy for tests and for callers that want the
/// whole result before encoding anything.
#[derive(Debug, Default)]
pub struct VecSink {
    pub polygons: Vec<SegmentPolygon>,
}

impl PolygonSink for VecSink {
    fn write_polygon(&mut self, polygon: &SegmentPolygon) -> Result<()> {
        self.polygons.push(polygon.clone());
        Ok(())
    }
}
