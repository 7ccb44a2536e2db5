//! Filesystem discovery of import files.

pub mod depth;
pub mod locator;

pub use depth::{DepthComparator, DepthOperator, DepthRange};
pub use locator::{DiscoveryQuery, locate};
