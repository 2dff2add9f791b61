// Application Layer - Use Cases and Service Composition

pub mod convert;
pub mod dispatch;
pub mod service;
pub mod stats;
pub mod submit;

// Re-exports
pub use convert::ConvertRunner;
pub use dispatch::Dispatcher;
pub use service::ConvertService;
pub use stats::{ServiceStats, StatsSnapshot};
pub use submit::SubmitRequest;
