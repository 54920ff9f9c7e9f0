// Resolution strategies mapping structural elements onto descriptors.
//
// Each strategy claims elements of one shape and owns one identifier segment
// type. The driver composes them: an element is offered to every strategy, a
// segment to each in turn until one reconstructs it. Declining is always a
// plain "no result", never an error.

pub mod container;
pub mod method;
pub mod nested;

pub use container::ContainerResolver;
pub use method::MethodResolver;
pub use nested::NestedContainerResolver;

use crate::descriptor::{
    Descriptor, DescriptorKind, ElementSource, PrunePolicy, Segment, UniqueId,
};
use crate::model::{ContainerModel, ElementRegistry, MethodModel, TEMPLATE_MARKER};

/// A structural unit offered to the resolver set.
#[derive(Debug, Clone, Copy)]
pub enum StructuralElement<'a> {
    Container(&'a ContainerModel),
    Method {
        container: &'a ContainerModel,
        method: &'a MethodModel,
    },
}

impl StructuralElement<'_> {
    pub fn describe(&self) -> String {
        match self {
            Self::Container(container) => container.qualified_name.clone(),
            Self::Method { container, method } => {
                format!("{}#{}", container.qualified_name, method.signature())
            }
        }
    }
}

/// One pluggable resolution strategy.
pub trait ElementResolver {
    fn name(&self) -> &'static str;

    /// Maps one structural element under one candidate parent to zero or
    /// more freshly minted descriptors. Empty means this strategy does not
    /// claim the element.
    fn resolve_element(
        &self,
        element: &StructuralElement<'_>,
        parent: &Descriptor,
        registry: &ElementRegistry,
    ) -> Vec<Descriptor>;

    /// Reconstructs the descriptor one identifier segment denotes under the
    /// candidate parent. `None` when the segment type is not this
    /// strategy's, the parent is of the wrong shape, or the denoted element
    /// no longer exists.
    fn resolve_segment(
        &self,
        segment: &Segment,
        parent: &Descriptor,
        registry: &ElementRegistry,
    ) -> Option<Descriptor>;
}

/// The strategy set used by standard discovery, in probing order.
pub fn default_resolvers() -> Vec<Box<dyn ElementResolver>> {
    vec![
        Box::new(ContainerResolver),
        Box::new(NestedContainerResolver),
        Box::new(MethodResolver),
    ]
}

/// Builds a container descriptor, choosing the template subtype when the
/// container carries the template marker.
pub(crate) fn mint_container(container: &ContainerModel, unique_id: UniqueId) -> Descriptor {
    let type_label = if container.has_marker(TEMPLATE_MARKER) {
        "container-template"
    } else {
        "container"
    };
    Descriptor::new(
        unique_id,
        container.simple_name(),
        DescriptorKind::Container,
        type_label,
        ElementSource::Container {
            qualified_name: container.qualified_name.clone(),
        },
    )
    .with_tags(container.tags())
    .with_dynamic_filter()
    .with_prune_policy(PrunePolicy::Standard)
}
