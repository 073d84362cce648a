use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, Geometry, Value};

use crate::{
    error::Result,
    traits::{PolygonSink, StatsSink},
    types::{LabelStatsTable, SegmentPolygon, WorldRing},
};

/// GeoJSON-backed polygon sink.
///
/// Accumulates one feature per polygon with the attribute schema of the
/// original shapefile output: `class` (label id), `area_px` (pixel count),
/// and one `{n}_mean` / `{n}_stddev` pair per band, 1-based. Polygons whose
/// boundary could not be fully closed additionally carry `complete: false`.
#[derive(Debug, Default)]
pub struct GeoJsonWriter {
    features: Vec<Feature>,
}

impl GeoJsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn into_feature_collection(self) -> FeatureCollection {
        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert(
            "polygon_count".to_string(),
            serde_json::Value::Number(serde_json::Number::from(self.features.len())),
        );

        FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members: Some(foreign_members),
        }
    }

    pub fn to_string_pretty(self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.into_feature_collection())?)
    }

    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let contents = self.to_string_pretty()?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn ring_positions(ring: &WorldRing) -> Vec<Vec<f64>> {
    ring.iter().map(|&[x, y]| vec![x, y]).collect()
}

impl PolygonSink for GeoJsonWriter {
    fn write_polygon(&mut self, polygon: &SegmentPolygon) -> Result<()> {
        let mut rings = vec![ring_positions(&polygon.exterior)];
        rings.extend(polygon.interior_rings.iter().map(ring_positions));
        let geometry = Geometry::new(Value::Polygon(rings));

        let mut properties = serde_json::Map::new();
        properties.insert(
            "class".to_string(),
            serde_json::Value::Number(serde_json::Number::from(polygon.label)),
        );
        properties.insert(
            "area_px".to_string(),
            serde_json::Value::Number(serde_json::Number::from(polygon.stats.pixel_count)),
        );
        for (b, (mean, stddev)) in polygon
            .stats
            .mean
            .iter()
            .zip(&polygon.stats.stddev)
            .enumerate()
        {
            properties.insert(
                format!("{}_mean", b + 1),
                serde_json::Value::Number(
                    serde_json::Number::from_f64(*mean)
                        .unwrap_or_else(|| serde_json::Number::from(0)),
                ),
            );
            properties.insert(
                format!("{}_stddev", b + 1),
                serde_json::Value::Number(
                    serde_json::Number::from_f64(*stddev)
                        .unwrap_or_else(|| serde_json::Number::from(0)),
                ),
            );
        }
        if !polygon.complete {
            properties.insert("complete".to_string(), serde_json::Value::Bool(false));
        }

        self.features.push(Feature {
            bbox: None,
            geometry: Some(geometry),
            id: Some(geojson::feature::Id::Number(serde_json::Number::from(
                polygon.label,
            ))),
            properties: Some(properties),
            foreign_members: None,
        });

        Ok(())
    }
}

/// Archives the raw per-label/per-band statistics tables as a JSON file next
/// to the vector output.
#[derive(Debug)]
pub struct JsonStatsWriter {
    path: PathBuf,
}

impl JsonStatsWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl StatsSink for JsonStatsWriter {
    fn write_stats(&mut self, table: &LabelStatsTable) -> Result<()> {
        let contents = serde_json::to_string_pretty(table)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabelStats;

    fn sample_polygon() -> SegmentPolygon {
        SegmentPolygon {
            label: 3,
            exterior: vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]],
            interior_rings: vec![],
            complete: true,
            stats: LabelStats {
                pixel_count: 4,
                mean: vec![12.5, -3.0],
                stddev: vec![0.5, 1.25],
            },
        }
    }

    #[test]
    fn writes_one_feature_per_polygon() {
        let mut writer = GeoJsonWriter::new();
        writer.write_polygon(&sample_polygon()).unwrap();

        let collection = writer.into_feature_collection();
        assert_eq!(collection.features.len(), 1);

        let props = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(props["class"], 3);
        assert_eq!(props["area_px"], 4);
        assert_eq!(props["1_mean"], 12.5);
        assert_eq!(props["2_stddev"], 1.25);
        assert!(!props.contains_key("complete"));
    }

    #[test]
    fn incomplete_polygons_are_flagged() {
        let mut polygon = sample_polygon();
        polygon.complete = false;

        let mut writer = GeoJsonWriter::new();
        writer.write_polygon(&polygon).unwrap();
        let collection = writer.into_feature_collection();
        let props = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(props["complete"], false);
    }

    #[test]
    fn geometry_carries_interior_rings() {
        let mut polygon = sample_polygon();
        polygon.interior_rings = vec![vec![
            [0.5, 0.5],
            [0.5, 1.0],
            [1.0, 1.0],
            [1.0, 0.5],
            [0.5, 0.5],
        ]];

        let mut writer = GeoJsonWriter::new();
        writer.write_polygon(&polygon).unwrap();
        let collection = writer.into_feature_collection();
        let geometry = collection.features[0].geometry.as_ref().unwrap();
        match &geometry.value {
            Value::Polygon(rings) => assert_eq!(rings.len(), 2),
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn serializes_to_valid_geojson() {
        let mut writer = GeoJsonWriter::new();
        writer.write_polygon(&sample_polygon()).unwrap();
        let text = writer.to_string_pretty().unwrap();

        let parsed: FeatureCollection = text.parse().unwrap();
        assert_eq!(parsed.features.len(), 1);
    }
}
