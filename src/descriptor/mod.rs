pub mod filter;
pub mod tree;
pub mod unique_id;

pub use filter::DynamicDescendantFilter;
pub use tree::{DescriptorTree, NodeId};
pub use unique_id::{ParseUniqueIdError, Segment, UniqueId, ENGINE_SEGMENT_TYPE};

use std::collections::BTreeSet;

/// Whether a node is a describable container, an executable test, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Container,
    Test,
    ContainerAndTest,
}

impl DescriptorKind {
    pub fn is_container(self) -> bool {
        matches!(self, Self::Container | Self::ContainerAndTest)
    }

    pub fn is_test(self) -> bool {
        matches!(self, Self::Test | Self::ContainerAndTest)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Test => "test",
            Self::ContainerAndTest => "container-and-test",
        }
    }
}

/// Opaque back-reference to the structural unit a descriptor was minted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSource {
    Engine { id: String },
    Container { qualified_name: String },
    Method { container: String, signature: String },
}

impl ElementSource {
    pub fn container_name(&self) -> Option<&str> {
        match self {
            Self::Container { qualified_name } => Some(qualified_name),
            _ => None,
        }
    }
}

/// Pruning behavior for one descriptor. `Standard` removes the subtree when
/// it holds no test; `Keep` opts the node out of pruning entirely, for
/// containers whose children only materialize after discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrunePolicy {
    #[default]
    Standard,
    Keep,
}

/// A node value in the discovery tree. Parent/child wiring lives in
/// [`DescriptorTree`]; the descriptor itself carries identity and display
/// data plus the optional dynamic-filter capability.
#[derive(Debug, Clone)]
pub struct Descriptor {
    unique_id: UniqueId,
    display_name: String,
    kind: DescriptorKind,
    type_label: &'static str,
    source: ElementSource,
    tags: BTreeSet<String>,
    dynamic_filter: Option<DynamicDescendantFilter>,
    prune_policy: PrunePolicy,
}

impl Descriptor {
    pub fn new(
        unique_id: UniqueId,
        display_name: impl Into<String>,
        kind: DescriptorKind,
        type_label: &'static str,
        source: ElementSource,
    ) -> Self {
        Self {
            unique_id,
            display_name: display_name.into(),
            kind,
            type_label,
            source,
            tags: BTreeSet::new(),
            dynamic_filter: None,
            prune_policy: PrunePolicy::Standard,
        }
    }

    pub fn with_tags(mut self, tags: BTreeSet<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Grants the dynamic-descendant-filter capability, starting closed.
    pub fn with_dynamic_filter(mut self) -> Self {
        self.dynamic_filter = Some(DynamicDescendantFilter::new());
        self
    }

    pub fn with_prune_policy(mut self, policy: PrunePolicy) -> Self {
        self.prune_policy = policy;
        self
    }

    pub fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    pub fn type_label(&self) -> &'static str {
        self.type_label
    }

    pub fn source(&self) -> &ElementSource {
        &self.source
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn dynamic_filter(&self) -> Option<&DynamicDescendantFilter> {
        self.dynamic_filter.as_ref()
    }

    pub fn dynamic_filter_mut(&mut self) -> Option<&mut DynamicDescendantFilter> {
        self.dynamic_filter.as_mut()
    }

    pub fn prune_policy(&self) -> PrunePolicy {
        self.prune_policy
    }
}
