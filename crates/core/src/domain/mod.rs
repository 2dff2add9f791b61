// Domain Layer - Pure conversion logic and entities

pub mod error;
pub mod job;
pub mod ramp;
pub mod raster;
pub mod record;

// Re-exports
pub use error::DomainError;
pub use job::{JobId, JobSpace};
pub use ramp::CharRamp;
pub use raster::{IntensityGrid, RasterError, SourceImage};
pub use record::{ConvertOutcome, JobState, StatusRecord};
