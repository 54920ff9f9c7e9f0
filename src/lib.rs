/// Test Discovery
///
/// A selector-driven test discovery engine that resolves containers, methods
/// and hierarchical unique ids into a mutable descriptor tree.
pub mod cli;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;

pub use descriptor::{Descriptor, DescriptorTree, NodeId, UniqueId};
pub use discovery::{discover, DiscoveryDriver, DiscoverySelector, Root};
pub use error::{Error, Result};
