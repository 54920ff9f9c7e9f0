use crate::descriptor::{Descriptor, DescriptorKind, ElementSource, PrunePolicy, UniqueId};
use crate::error::TreeError;
use std::collections::HashMap;

/// Handle to a node in a [`DescriptorTree`]. Handles stay stable for the
/// lifetime of the tree; a handle whose node was detached goes stale and all
/// lookups through it return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Slot {
    descriptor: Descriptor,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// One engine's descriptor tree. Nodes live in an arena; parents are
/// non-owning back-references, children an insertion-ordered set unique by
/// identifier. Slots of detached nodes are never reused, so identifiers
/// cannot be resurrected within a discovery pass.
#[derive(Debug)]
pub struct DescriptorTree {
    slots: Vec<Option<Slot>>,
    index: HashMap<UniqueId, NodeId>,
    root: NodeId,
    engine_id: String,
}

impl DescriptorTree {
    pub fn new(engine_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let engine_id = engine_id.into();
        let unique_id = UniqueId::root(engine_id.clone());
        let descriptor = Descriptor::new(
            unique_id.clone(),
            display_name,
            DescriptorKind::Container,
            "engine",
            ElementSource::Engine {
                id: engine_id.clone(),
            },
        );

        let root = NodeId(0);
        let mut index = HashMap::new();
        index.insert(unique_id, root);

        Self {
            slots: vec![Some(Slot {
                descriptor,
                parent: None,
                children: Vec::new(),
            })],
            index,
            root,
            engine_id,
        }
    }

    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_root(&self, node: NodeId) -> bool {
        node == self.root
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.slot(node).is_some()
    }

    pub fn descriptor(&self, node: NodeId) -> Option<&Descriptor> {
        self.slot(node).map(|slot| &slot.descriptor)
    }

    pub fn descriptor_mut(&mut self, node: NodeId) -> Option<&mut Descriptor> {
        self.slot_mut(node).map(|slot| &mut slot.descriptor)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).and_then(|slot| slot.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.slot(node)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn find_by_unique_id(&self, unique_id: &UniqueId) -> Option<NodeId> {
        self.index.get(unique_id).copied()
    }

    /// Number of live descriptors, the root included.
    pub fn descriptor_count(&self) -> usize {
        self.index.len()
    }

    /// Attaches `descriptor` under `parent`.
    ///
    /// Idempotent when a node with the same identifier is already a child of
    /// `parent`: the existing handle is returned and no duplicate entry is
    /// made. An identifier living anywhere else in the tree is a structural
    /// misuse, as is an identifier that is not the parent's id plus exactly
    /// one segment.
    pub fn add_child(&mut self, parent: NodeId, descriptor: Descriptor) -> Result<NodeId, TreeError> {
        let parent_id = self
            .descriptor(parent)
            .map(|d| d.unique_id().clone())
            .ok_or(TreeError::UnknownNode { index: parent.0 })?;

        let child_id = descriptor.unique_id().clone();
        if child_id.parent().as_ref() != Some(&parent_id) {
            return Err(TreeError::not_a_direct_child(
                parent_id.to_string(),
                child_id.to_string(),
            ));
        }

        if let Some(existing) = self.index.get(&child_id).copied() {
            if self.parent(existing) == Some(parent) {
                return Ok(existing);
            }
            return Err(TreeError::duplicate_unique_id(child_id.to_string()));
        }

        let node = NodeId(self.slots.len());
        self.slots.push(Some(Slot {
            descriptor,
            parent: Some(parent),
            children: Vec::new(),
        }));
        self.index.insert(child_id, node);
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(node);
        }
        Ok(node)
    }

    /// Detaches and discards `child` if it currently is a child of `parent`;
    /// no-op otherwise.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    /// Detaches this non-root node from its parent and discards the whole
    /// subtree below it. Invoking this on the root is a usage error.
    pub fn remove_from_hierarchy(&mut self, node: NodeId) -> Result<(), TreeError> {
        if node == self.root {
            let display_name = self
                .descriptor(node)
                .map(|d| d.display_name().to_string())
                .unwrap_or_default();
            return Err(TreeError::root_removal(display_name));
        }
        if !self.contains(node) {
            return Err(TreeError::UnknownNode { index: node.0 });
        }
        self.detach(node);
        Ok(())
    }

    /// Unlinks `node` from its parent and frees the subtree. Root and stale
    /// handles are ignored; callers wanting an error go through
    /// [`Self::remove_from_hierarchy`].
    pub(crate) fn detach(&mut self, node: NodeId) {
        if node == self.root || !self.contains(node) {
            return;
        }
        if let Some(parent) = self.parent(node) {
            if let Some(slot) = self.slot_mut(parent) {
                slot.children.retain(|&c| c != node);
            }
        }

        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if let Some(slot) = self.slots[current.0].take() {
                self.index.remove(slot.descriptor.unique_id());
                pending.extend(slot.children);
            }
        }
    }

    /// Whether the subtree rooted at `node` holds at least one test.
    pub fn contains_tests(&self, node: NodeId) -> bool {
        let Some(slot) = self.slot(node) else {
            return false;
        };
        if slot.descriptor.kind().is_test() {
            return true;
        }
        slot.children.iter().any(|&child| self.contains_tests(child))
    }

    /// Removes every branch that holds no test, honoring each descriptor's
    /// prune policy. The root is never removed, even when its tree ends up
    /// empty.
    pub fn prune(&mut self) {
        let root = self.root;
        self.apply_in_subtree_top_down(root, &mut |tree, node| {
            if tree.is_root(node) {
                return;
            }
            let policy = tree
                .descriptor(node)
                .map(|d| d.prune_policy())
                .unwrap_or(PrunePolicy::Standard);
            if policy == PrunePolicy::Standard && !tree.contains_tests(node) {
                tree.detach(node);
            }
        });
    }

    /// Visits every node of the subtree once, self before descendants. The
    /// child set is snapshotted before recursing, so a visitor may attach or
    /// detach nodes without corrupting the iteration; nodes the visitor
    /// removed are skipped.
    pub fn apply_in_subtree_top_down<F>(&mut self, start: NodeId, visitor: &mut F)
    where
        F: FnMut(&mut Self, NodeId),
    {
        if !self.contains(start) {
            return;
        }
        visitor(self, start);
        let snapshot: Vec<NodeId> = self.children(start).to_vec();
        for child in snapshot {
            self.apply_in_subtree_top_down(child, visitor);
        }
    }

    /// Visits every node of the subtree once, descendants before self, with
    /// the same snapshot guarantee as the top-down variant.
    pub fn apply_in_subtree_bottom_up<F>(&mut self, start: NodeId, visitor: &mut F)
    where
        F: FnMut(&mut Self, NodeId),
    {
        if !self.contains(start) {
            return;
        }
        let snapshot: Vec<NodeId> = self.children(start).to_vec();
        for child in snapshot {
            self.apply_in_subtree_bottom_up(child, visitor);
        }
        if self.contains(start) {
            visitor(self, start);
        }
    }

    fn slot(&self, node: NodeId) -> Option<&Slot> {
        self.slots.get(node.0).and_then(|slot| slot.as_ref())
    }

    fn slot_mut(&mut self, node: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(node.0).and_then(|slot| slot.as_mut())
    }
}
