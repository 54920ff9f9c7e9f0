use crate::descriptor::unique_id::UniqueId;
use std::collections::BTreeSet;

/// Per-node allow-list gating the materialization of descendants that have
/// not been created yet.
///
/// A freshly minted filter allows nothing. Descriptors discovered as the
/// direct target of a broad selector are switched to allow-all; descriptors
/// reached through a narrow identifier path collect the requested ids
/// instead, and only descendants on one of those paths may materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicDescendantFilter {
    AllowAll,
    Explicit(BTreeSet<UniqueId>),
}

impl Default for DynamicDescendantFilter {
    fn default() -> Self {
        Self::Explicit(BTreeSet::new())
    }
}

impl DynamicDescendantFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to allow-all. Allow-all is sticky: once a node has been
    /// discovered broadly, later narrow requests must not restrict it again.
    pub fn allow_all(&mut self) {
        *self = Self::AllowAll;
    }

    /// Records one requested identifier. No-op in allow-all mode.
    pub fn allow(&mut self, unique_id: UniqueId) {
        if let Self::Explicit(allowed) = self {
            allowed.insert(unique_id);
        }
    }

    /// Whether a descendant with the given id may be materialized.
    ///
    /// An explicit filter admits an id when some allowed id lies on the same
    /// root-to-leaf path: either the allowed id covers this one (so the whole
    /// subtree was requested) or this id is an ancestor that must exist for
    /// the requested id to ever be reached.
    pub fn allows(&self, unique_id: &UniqueId) -> bool {
        match self {
            Self::AllowAll => true,
            Self::Explicit(allowed) => allowed
                .iter()
                .any(|a| a.is_prefix_of(unique_id) || unique_id.is_prefix_of(a)),
        }
    }

    pub fn is_allow_all(&self) -> bool {
        matches!(self, Self::AllowAll)
    }

    /// The explicitly allowed ids, empty in allow-all mode.
    pub fn allowed_ids(&self) -> Vec<&UniqueId> {
        match self {
            Self::AllowAll => Vec::new(),
            Self::Explicit(allowed) => allowed.iter().collect(),
        }
    }
}
