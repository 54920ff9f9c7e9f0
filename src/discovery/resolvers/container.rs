use crate::descriptor::{Descriptor, Segment};
use crate::discovery::resolvers::{mint_container, ElementResolver, StructuralElement};
use crate::model::{is_potential_container, ElementRegistry};

/// Claims top-level containers and owns the `class` segment type. The
/// segment value is the container's qualified name, so a recorded id can be
/// reconstructed by loading that name from the registry.
pub struct ContainerResolver;

pub const SEGMENT_TYPE: &str = "class";

impl ElementResolver for ContainerResolver {
    fn name(&self) -> &'static str {
        "container"
    }

    fn resolve_element(
        &self,
        element: &StructuralElement<'_>,
        parent: &Descriptor,
        _registry: &ElementRegistry,
    ) -> Vec<Descriptor> {
        let StructuralElement::Container(container) = element else {
            return Vec::new();
        };
        if !is_potential_container(container) {
            return Vec::new();
        }

        let unique_id = parent
            .unique_id()
            .append(SEGMENT_TYPE, &container.qualified_name);
        vec![mint_container(container, unique_id)]
    }

    fn resolve_segment(
        &self,
        segment: &Segment,
        parent: &Descriptor,
        registry: &ElementRegistry,
    ) -> Option<Descriptor> {
        if segment.segment_type() != SEGMENT_TYPE {
            return None;
        }

        let container = registry.load_container(segment.value())?;
        if !is_potential_container(container) {
            return None;
        }

        let unique_id = parent
            .unique_id()
            .append(SEGMENT_TYPE, &container.qualified_name);
        Some(mint_container(container, unique_id))
    }
}
