pub mod geojson;

pub use geojson::{GeoJsonWriter, JsonStatsWriter};
