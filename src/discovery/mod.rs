pub mod driver;
pub mod resolvers;
pub mod root;
pub mod selector;

pub use driver::DiscoveryDriver;
pub use resolvers::{
    default_resolvers, ContainerResolver, ElementResolver, MethodResolver,
    NestedContainerResolver, StructuralElement,
};
pub use root::{ExclusionReport, FilterOutcome, Root};
pub use selector::{discover, DiscoverySelector};
