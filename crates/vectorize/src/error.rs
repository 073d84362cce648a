use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorizeError {
    #[error("raster input error: {0}")]
    Grid(#[from] raster_grid::GridError),

    #[error("polygon sink error: {0}")]
    Sink(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VectorizeError>;
