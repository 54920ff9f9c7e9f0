use crate::descriptor::{DescriptorTree, NodeId};
use tracing::{debug, info};

/// Verdict of a post-discovery filter for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Included,
    Excluded(String),
}

impl FilterOutcome {
    pub fn excluded(reason: impl Into<String>) -> Self {
        Self::Excluded(reason.into())
    }
}

/// The forest of all engines' descriptor trees discovered in one session.
#[derive(Debug, Default)]
pub struct Root {
    engines: Vec<DescriptorTree>,
}

impl Root {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tree: DescriptorTree) {
        self.engines.push(tree);
    }

    pub fn trees(&self) -> &[DescriptorTree] {
        &self.engines
    }

    pub fn trees_mut(&mut self) -> &mut [DescriptorTree] {
        &mut self.engines
    }

    pub fn tree_for(&self, engine_id: &str) -> Option<&DescriptorTree> {
        self.engines.iter().find(|t| t.engine_id() == engine_id)
    }

    /// Applies an exclusion rule across every tree, top-down.
    ///
    /// Only leaf positions are candidates: a container that still has
    /// children is never excluded, its children may yet be wanted. Excluded
    /// descriptors are detached immediately and their reasons collected,
    /// grouped for reporting.
    pub fn apply_post_discovery_filters<F>(&mut self, rule: F) -> ExclusionReport
    where
        F: Fn(&DescriptorTree, NodeId) -> FilterOutcome,
    {
        let mut report = ExclusionReport::default();
        for tree in &mut self.engines {
            let start = tree.root();
            tree.apply_in_subtree_top_down(start, &mut |tree, node| {
                if tree.is_root(node) || !tree.children(node).is_empty() {
                    return;
                }
                if let FilterOutcome::Excluded(reason) = rule(tree, node) {
                    if let Some(descriptor) = tree.descriptor(node) {
                        report.record(
                            reason,
                            descriptor.display_name().to_string(),
                            descriptor.kind().is_container(),
                            descriptor.kind().is_test(),
                        );
                    }
                    tree.detach(node);
                }
            });
        }
        report.log();
        report
    }

    /// Removes branches without tests in every tree, honoring each
    /// descriptor's prune policy. An engine whose tree ends up empty keeps
    /// its root.
    pub fn prune(&mut self) {
        for tree in &mut self.engines {
            tree.prune();
        }
    }
}

/// Excluded descriptors of one filter pass, grouped by exclusion reason in
/// first-seen order.
#[derive(Debug, Default)]
pub struct ExclusionReport {
    by_reason: Vec<(String, Vec<ExcludedEntry>)>,
}

#[derive(Debug)]
struct ExcludedEntry {
    display_name: String,
    container: bool,
    test: bool,
}

impl ExclusionReport {
    fn record(&mut self, reason: String, display_name: String, container: bool, test: bool) {
        let entry = ExcludedEntry {
            display_name,
            container,
            test,
        };
        match self.by_reason.iter_mut().find(|(r, _)| *r == reason) {
            Some((_, entries)) => entries.push(entry),
            None => self.by_reason.push((reason, vec![entry])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_reason.is_empty()
    }

    pub fn total_excluded(&self) -> usize {
        self.by_reason.iter().map(|(_, e)| e.len()).sum()
    }

    pub fn reasons(&self) -> Vec<&str> {
        self.by_reason.iter().map(|(r, _)| r.as_str()).collect()
    }

    pub fn display_names_for(&self, reason: &str) -> Vec<&str> {
        self.by_reason
            .iter()
            .find(|(r, _)| r == reason)
            .map(|(_, entries)| entries.iter().map(|e| e.display_name.as_str()).collect())
            .unwrap_or_default()
    }

    fn log(&self) {
        for (reason, entries) in &self.by_reason {
            let containers = entries.iter().filter(|e| e.container).count();
            let tests = entries.iter().filter(|e| e.test).count();
            info!("{containers} containers and {tests} tests were {reason}");

            let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
            debug!(
                "The following containers and tests were {}: {}",
                reason,
                names.join(", ")
            );
        }
    }
}
