pub mod boundary;
pub mod rings;
pub mod simplification;
pub mod stats;

pub use boundary::extract_boundaries;
pub use rings::{BuiltRings, build_rings};
pub use simplification::{douglas_peucker, prune_collinear};
pub use stats::aggregate;
