use crate::descriptor::{Descriptor, Segment};
use crate::discovery::resolvers::{mint_container, ElementResolver, StructuralElement};
use crate::model::{is_nested_container, ElementRegistry};

/// Claims containers declared inside another container and owns the
/// `nested-class` segment type. The segment value is the simple name; the
/// qualified name is rebuilt from the parent container during
/// reconstruction.
pub struct NestedContainerResolver;

pub const SEGMENT_TYPE: &str = "nested-class";

impl ElementResolver for NestedContainerResolver {
    fn name(&self) -> &'static str {
        "nested-container"
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
        if !is_nested_container(container) {
            return Vec::new();
        }
        // only claimed under the descriptor of the declaring container
        let Some(parent_name) = parent.source().container_name() else {
            return Vec::new();
        };
        if container.enclosing.as_deref() != Some(parent_name) {
            return Vec::new();
        }

        let unique_id = parent
            .unique_id()
            .append(SEGMENT_TYPE, container.simple_name());
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
        let parent_name = parent.source().container_name()?;

        let qualified_name = format!("{parent_name}${}", segment.value());
        let container = registry.load_container(&qualified_name)?;
        if !is_nested_container(container) {
            return None;
        }

        let unique_id = parent
            .unique_id()
            .append(SEGMENT_TYPE, container.simple_name());
        Some(mint_container(container, unique_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorTree, UniqueId};
    use crate::model::ContainerModel;

    fn outer_descriptor() -> Descriptor {
        let mut tree = DescriptorTree::new("e1", "Engine One");
        let root = tree.root();
        let outer = ContainerModel::new("com.example.Outer");
        let minted = mint_container(
            &outer,
            UniqueId::root("e1").append("class", "com.example.Outer"),
        );
        let node = tree.add_child(root, minted).unwrap();
        tree.descriptor(node).unwrap().clone()
    }

    fn inner_model() -> ContainerModel {
        ContainerModel::new("com.example.Outer$Inner").with_enclosing("com.example.Outer")
    }

    #[test]
    fn test_claims_nested_container_under_declaring_parent() {
        let parent = outer_descriptor();
        let registry = ElementRegistry::new();
        let inner = inner_model();

        let minted = NestedContainerResolver.resolve_element(
            &StructuralElement::Container(&inner),
            &parent,
            &registry,
        );

        assert_eq!(minted.len(), 1);
        assert_eq!(
            minted[0].unique_id().to_string(),
            "[engine:e1]/[class:com.example.Outer]/[nested-class:Inner]"
        );
        assert_eq!(minted[0].display_name(), "Inner");
    }

    #[test]
    fn test_declines_under_engine_root() {
        let tree = DescriptorTree::new("e1", "Engine One");
        let root = tree.descriptor(tree.root()).unwrap().clone();
        let registry = ElementRegistry::new();
        let inner = inner_model();

        assert!(NestedContainerResolver
            .resolve_element(&StructuralElement::Container(&inner), &root, &registry)
            .is_empty());
    }

    #[test]
    fn test_declines_under_foreign_container() {
        let parent = outer_descriptor();
        let registry = ElementRegistry::new();
        let stranger =
            ContainerModel::new("com.example.Other$Inner").with_enclosing("com.example.Other");

        assert!(NestedContainerResolver
            .resolve_element(&StructuralElement::Container(&stranger), &parent, &registry)
            .is_empty());
    }

    #[test]
    fn test_declines_top_level_container() {
        let parent = outer_descriptor();
        let registry = ElementRegistry::new();
        let top_level = ContainerModel::new("com.example.Top");

        assert!(NestedContainerResolver
            .resolve_element(&StructuralElement::Container(&top_level), &parent, &registry)
            .is_empty());
    }

    #[test]
    fn test_segment_reconstruction_rebuilds_qualified_name() {
        let parent = outer_descriptor();
        let mut registry = ElementRegistry::new();
        registry.add_container(inner_model());

        let segment = Segment::new(SEGMENT_TYPE, "Inner");
        let descriptor = NestedContainerResolver
            .resolve_segment(&segment, &parent, &registry)
            .unwrap();
        assert_eq!(
            descriptor.source().container_name(),
            Some("com.example.Outer$Inner")
        );
    }

    #[test]
    fn test_segment_under_engine_root_is_declined() {
        let tree = DescriptorTree::new("e1", "Engine One");
        let root = tree.descriptor(tree.root()).unwrap().clone();
        let mut registry = ElementRegistry::new();
        registry.add_container(inner_model());

        let segment = Segment::new(SEGMENT_TYPE, "Inner");
        assert!(NestedContainerResolver
            .resolve_segment(&segment, &root, &registry)
            .is_none());
    }

    #[test]
    fn test_segment_for_removed_container_is_not_found() {
        let parent = outer_descriptor();
        let registry = ElementRegistry::new();

        let segment = Segment::new(SEGMENT_TYPE, "Gone");
        assert!(NestedContainerResolver
            .resolve_segment(&segment, &parent, &registry)
            .is_none());
    }
}
