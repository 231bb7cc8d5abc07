pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod metrics;
pub mod tree;

pub use config::Config;
pub use diff::{Change, DiffResult, PathSegment};
pub use error::{Error, Result};
pub use format::DocFormat;
pub use metrics::{LargerSide, Metrics};
pub use tree::Tree;
