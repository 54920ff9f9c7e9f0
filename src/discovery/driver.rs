use crate::descriptor::{DescriptorTree, DynamicDescendantFilter, NodeId, UniqueId};
use crate::discovery::resolvers::{default_resolvers, ElementResolver, StructuralElement};
use crate::error::TreeError;
use crate::model::{ContainerModel, ElementRegistry, MethodModel};
use tracing::{debug, warn};

/// Drives one discovery pass: maps selectors onto descriptor-tree mutations
/// by composing the resolver set.
///
/// All three entry operations share the same recursive primitive and the
/// same deduplication rule: a minted descriptor is attached only when no
/// descriptor with its identifier exists anywhere in the tree; otherwise the
/// existing instance is reused and the new one discarded.
pub struct DiscoveryDriver<'a> {
    registry: &'a ElementRegistry,
    resolvers: Vec<Box<dyn ElementResolver>>,
}

impl<'a> DiscoveryDriver<'a> {
    pub fn new(registry: &'a ElementRegistry) -> Self {
        Self {
            registry,
            resolvers: default_resolvers(),
        }
    }

    pub fn with_resolvers(
        registry: &'a ElementRegistry,
        resolvers: Vec<Box<dyn ElementResolver>>,
    ) -> Self {
        Self {
            registry,
            resolvers,
        }
    }

    /// Resolves a container selector: enclosing containers first, then the
    /// container itself under every potential parent, then its children.
    pub fn resolve_container(
        &self,
        tree: &mut DescriptorTree,
        container: &ContainerModel,
    ) -> Result<(), TreeError> {
        let resolved = self.resolve_container_with_parents(tree, container)?;
        if resolved.is_empty() {
            debug!(
                "Container '{}' could not be resolved.",
                container.qualified_name
            );
        }
        for node in resolved {
            self.resolve_children(tree, node)?;
        }
        Ok(())
    }

    /// Resolves a method selector: the declaring container's descriptors
    /// become the potential parents, and the method is resolved under each.
    pub fn resolve_method(
        &self,
        tree: &mut DescriptorTree,
        container: &ContainerModel,
        method: &MethodModel,
    ) -> Result<(), TreeError> {
        let parents = self.resolve_container_with_parents(tree, container)?;
        let element = StructuralElement::Method { container, method };
        let resolved = self.resolve_for_all_parents(tree, &element, &parents)?;

        if resolved.is_empty() {
            debug!("Method '{}' could not be resolved.", element.describe());
        }
        self.warn_on_competing_descriptors(tree, &element, &resolved);
        Ok(())
    }

    /// Resolves a unique-id selector. Identifiers owned by other engines are
    /// ignored entirely.
    ///
    /// The walk reuses descriptors already present for each partial id and
    /// asks the strategies to reconstruct missing segments. A walk that
    /// stops early either records the requested id in the deepest node's
    /// dynamic filter or, when that node is not filterable, logs the
    /// unresolved remainder.
    pub fn resolve_unique_id(
        &self,
        tree: &mut DescriptorTree,
        unique_id: &UniqueId,
    ) -> Result<(), TreeError> {
        if unique_id.engine_id() != Some(tree.engine_id()) {
            return Ok(());
        }

        let segments = unique_id.segments().to_vec();
        let mut resolved: Vec<NodeId> = vec![tree.root()];

        for segment in &segments[1..] {
            let parent = resolved[resolved.len() - 1];
            let Some(parent_descriptor) = tree.descriptor(parent).cloned() else {
                break;
            };
            let partial = parent_descriptor.unique_id().append_segment(segment.clone());

            let node = match tree.find_by_unique_id(&partial) {
                Some(existing) => Some(existing),
                None => {
                    let mut reconstructed = None;
                    for resolver in &self.resolvers {
                        if let Some(descriptor) =
                            resolver.resolve_segment(segment, &parent_descriptor, self.registry)
                        {
                            reconstructed = Some(tree.add_child(parent, descriptor)?);
                            break;
                        }
                    }
                    reconstructed
                }
            };

            match node {
                Some(node) => resolved.push(node),
                None => break,
            }
        }

        let segments_to_resolve = segments.len() - 1;
        let segments_resolved = resolved.len() - 1;

        if segments_resolved == 0 {
            warn!("Unique ID '{unique_id}' could not be resolved.");
            return Ok(());
        }

        let deepest = resolved[resolved.len() - 1];
        let filterable = match tree.descriptor_mut(deepest).and_then(|d| d.dynamic_filter_mut()) {
            Some(filter) => {
                filter.allow(unique_id.clone());
                true
            }
            None => false,
        };

        if segments_resolved < segments_to_resolve {
            if !filterable {
                let remainder: Vec<String> = segments[segments_resolved + 1..]
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                warn!(
                    "Unique ID '{}' could only be partially resolved. All resolved segments \
                     will be executed; the following segments could not be resolved: {}",
                    unique_id,
                    remainder.join(", ")
                );
            }
        } else {
            self.resolve_children(tree, deepest)?;
        }
        Ok(())
    }

    fn resolve_container_with_parents(
        &self,
        tree: &mut DescriptorTree,
        container: &ContainerModel,
    ) -> Result<Vec<NodeId>, TreeError> {
        let element = StructuralElement::Container(container);
        if let Some(enclosing) = self.registry.enclosing_of(container) {
            let parents = self.resolve_container_with_parents(tree, enclosing)?;
            self.resolve_for_all_parents(tree, &element, &parents)
        } else {
            let root = tree.root();
            self.resolve_for_all_parents(tree, &element, &[root])
        }
    }

    /// Resolves one element under every potential parent and switches every
    /// resulting filterable descriptor to allow-all: these nodes were
    /// discovered broadly, so nothing below them is held back.
    fn resolve_for_all_parents(
        &self,
        tree: &mut DescriptorTree,
        element: &StructuralElement<'_>,
        parents: &[NodeId],
    ) -> Result<Vec<NodeId>, TreeError> {
        let mut resolved = Vec::new();
        for &parent in parents {
            for node in self.resolve_element_under(tree, element, parent)? {
                if !resolved.contains(&node) {
                    resolved.push(node);
                }
            }
        }

        for &node in &resolved {
            if let Some(filter) = tree.descriptor_mut(node).and_then(|d| d.dynamic_filter_mut()) {
                filter.allow_all();
            }
        }
        Ok(resolved)
    }

    fn resolve_element_under(
        &self,
        tree: &mut DescriptorTree,
        element: &StructuralElement<'_>,
        parent: NodeId,
    ) -> Result<Vec<NodeId>, TreeError> {
        let resolved = self.resolve_gated(tree, element, parent, None)?;
        self.warn_on_competing_descriptors(tree, element, &resolved);
        Ok(resolved)
    }

    /// The dedup core. Offers the element to every strategy; reuses the
    /// existing node when the minted identifier is already present, attaches
    /// otherwise. With an explicit `filter`, fresh descriptors off every
    /// allowed path are discarded instead of attached.
    fn resolve_gated(
        &self,
        tree: &mut DescriptorTree,
        element: &StructuralElement<'_>,
        parent: NodeId,
        filter: Option<&DynamicDescendantFilter>,
    ) -> Result<Vec<NodeId>, TreeError> {
        let Some(parent_descriptor) = tree.descriptor(parent).cloned() else {
            return Ok(Vec::new());
        };

        let mut resolved = Vec::new();
        for resolver in &self.resolvers {
            for descriptor in resolver.resolve_element(element, &parent_descriptor, self.registry) {
                if let Some(existing) = tree.find_by_unique_id(descriptor.unique_id()) {
                    if !resolved.contains(&existing) {
                        resolved.push(existing);
                    }
                    continue;
                }
                if let Some(filter) = filter {
                    if !filter.allows(descriptor.unique_id()) {
                        continue;
                    }
                }
                let node = tree.add_child(parent, descriptor)?;
                if !resolved.contains(&node) {
                    resolved.push(node);
                }
            }
        }
        Ok(resolved)
    }

    /// Eagerly expands a container descriptor: declared methods first, then
    /// nested containers, recursively. Expansion is gated by the node's own
    /// dynamic descendant filter, so a narrowly requested container only
    /// materializes children on the requested paths.
    fn resolve_children(&self, tree: &mut DescriptorTree, node: NodeId) -> Result<(), TreeError> {
        let Some(descriptor) = tree.descriptor(node) else {
            return Ok(());
        };
        let Some(qualified_name) = descriptor.source().container_name().map(str::to_string) else {
            return Ok(());
        };
        let filter = descriptor.dynamic_filter().cloned();
        let Some(container) = self.registry.load_container(&qualified_name) else {
            return Ok(());
        };

        for method in self.registry.candidate_methods(container) {
            let element = StructuralElement::Method { container, method };
            self.resolve_gated(tree, &element, node, filter.as_ref())?;
        }

        for nested in self.registry.nested_containers(container) {
            let element = StructuralElement::Container(nested);
            let resolved = self.resolve_gated(tree, &element, node, filter.as_ref())?;
            for child in resolved {
                self.grant_descendant_allowances(tree, child, filter.as_ref());
                self.resolve_children(tree, child)?;
            }
        }
        Ok(())
    }

    /// Carries the parent's allowances down to a child materialized during
    /// expansion. A child fully covered by an allowed path opens up
    /// entirely; a child that is an ancestor of allowed paths inherits
    /// exactly those.
    fn grant_descendant_allowances(
        &self,
        tree: &mut DescriptorTree,
        child: NodeId,
        parent_filter: Option<&DynamicDescendantFilter>,
    ) {
        let Some(child_id) = tree.descriptor(child).map(|d| d.unique_id().clone()) else {
            return;
        };
        let Some(filter) = tree.descriptor_mut(child).and_then(|d| d.dynamic_filter_mut()) else {
            return;
        };

        match parent_filter {
            None => filter.allow_all(),
            Some(parent_filter) if parent_filter.is_allow_all() => filter.allow_all(),
            Some(parent_filter) => {
                let allowed: Vec<UniqueId> =
                    parent_filter.allowed_ids().into_iter().cloned().collect();
                if allowed.iter().any(|a| a.is_prefix_of(&child_id)) {
                    filter.allow_all();
                } else {
                    for id in allowed {
                        if child_id.is_prefix_of(&id) {
                            filter.allow(id);
                        }
                    }
                }
            }
        }
    }

    fn warn_on_competing_descriptors(
        &self,
        tree: &DescriptorTree,
        element: &StructuralElement<'_>,
        resolved: &[NodeId],
    ) {
        if resolved.len() <= 1 {
            return;
        }
        if let StructuralElement::Method { .. } = element {
            let labels: Vec<&str> = resolved
                .iter()
                .filter_map(|&node| tree.descriptor(node))
                .map(|d| d.type_label())
                .collect();
            warn!(
                "Possible configuration error: method '{}' resulted in multiple descriptors {:?}. \
                 This usually means several competing resolution strategies claim the same element.",
                element.describe(),
                labels
            );
        }
    }
}
