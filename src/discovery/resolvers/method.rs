use crate::descriptor::{Descriptor, DescriptorKind, ElementSource, Segment};
use crate::discovery::resolvers::{ElementResolver, StructuralElement};
use crate::model::{is_testable_method, ContainerModel, ElementRegistry, MethodModel};

/// Claims test-marked methods declared by an already-resolved container and
/// owns the `method` segment type. The segment value is the method
/// signature, unique among a container's declared methods.
pub struct MethodResolver;

pub const SEGMENT_TYPE: &str = "method";

impl MethodResolver {
    fn mint(container: &ContainerModel, method: &MethodModel, parent: &Descriptor) -> Descriptor {
        let signature = method.signature();
        let unique_id = parent.unique_id().append(SEGMENT_TYPE, &signature);
        Descriptor::new(
            unique_id,
            signature.clone(),
            DescriptorKind::Test,
            "method",
            ElementSource::Method {
                container: container.qualified_name.clone(),
                signature,
            },
        )
        .with_tags(method.tags())
    }
}

impl ElementResolver for MethodResolver {
    fn name(&self) -> &'static str {
        "method"
    }

    fn resolve_element(
        &self,
        element: &StructuralElement<'_>,
        parent: &Descriptor,
        _registry: &ElementRegistry,
    ) -> Vec<Descriptor> {
        let StructuralElement::Method { container, method } = element else {
            return Vec::new();
        };
        if !is_testable_method(method) {
            return Vec::new();
        }
        if parent.source().container_name() != Some(container.qualified_name.as_str()) {
            return Vec::new();
        }

        vec![Self::mint(container, method, parent)]
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
        let container = registry.load_container(parent.source().container_name()?)?;
        let method = container.find_method_by_signature(segment.value())?;
        if !is_testable_method(method) {
            return None;
        }

        Some(Self::mint(container, method, parent))
    }
}
