use crate::cli::OutputFormat;
use crate::descriptor::{DescriptorTree, NodeId};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;

/// Serializable view of one descriptor and its subtree.
#[derive(Debug, Serialize)]
pub struct NodeOutput {
    pub unique_id: String,
    pub display_name: String,
    pub kind: &'static str,
    pub type_label: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeOutput>,
}

pub struct TreeFormatter;

impl TreeFormatter {
    pub fn format(tree: &DescriptorTree, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(Self::render_text(tree)),
            OutputFormat::Json => {
                let output = Self::build_output(tree, tree.root());
                Ok(serde_json::to_string_pretty(&output)?)
            }
        }
    }

    pub fn build_output(tree: &DescriptorTree, node: NodeId) -> NodeOutput {
        let (unique_id, display_name, kind, type_label, tags) = match tree.descriptor(node) {
            Some(descriptor) => (
                descriptor.unique_id().to_string(),
                descriptor.display_name().to_string(),
                descriptor.kind().as_str(),
                descriptor.type_label(),
                descriptor.tags().iter().cloned().collect(),
            ),
            None => (String::new(), String::new(), "container", "", Vec::new()),
        };

        NodeOutput {
            unique_id,
            display_name,
            kind,
            type_label,
            tags,
            children: tree
                .children(node)
                .iter()
                .map(|&child| Self::build_output(tree, child))
                .collect(),
        }
    }

    fn render_text(tree: &DescriptorTree) -> String {
        let mut out = String::new();
        Self::render_node(tree, tree.root(), 0, &mut out);
        out
    }

    fn render_node(tree: &DescriptorTree, node: NodeId, depth: usize, out: &mut String) {
        if let Some(descriptor) = tree.descriptor(node) {
            let _ = writeln!(
                out,
                "{:indent$}{} [{}] {}",
                "",
                descriptor.display_name(),
                descriptor.type_label(),
                descriptor.unique_id(),
                indent = depth * 2
            );
        }
        for &child in tree.children(node) {
            Self::render_node(tree, child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoveryDriver;
    use crate::model::{ContainerModel, ElementRegistry, MethodModel, TEST_MARKER};
    use pretty_assertions::assert_eq;

    fn sample_tree() -> DescriptorTree {
        let mut registry = ElementRegistry::new();
        registry.add_container(
            ContainerModel::new("com.example.Foo")
                .with_method(MethodModel::new("bar").with_marker(TEST_MARKER)),
        );
        let driver = DiscoveryDriver::new(&registry);
        let mut tree = DescriptorTree::new("e1", "Engine One");
        let foo = registry.load_container("com.example.Foo").unwrap();
        driver.resolve_container(&mut tree, foo).unwrap();
        tree
    }

    #[test]
    fn test_text_rendering_indents_by_depth() {
        let tree = sample_tree();
        let text = TreeFormatter::format(&tree, OutputFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Engine One [engine] [engine:e1]");
        assert_eq!(lines[1], "  Foo [container] [engine:e1]/[class:com.example.Foo]");
        assert_eq!(
            lines[2],
            "    bar() [method] [engine:e1]/[class:com.example.Foo]/[method:bar()]"
        );
    }

    #[test]
    fn test_json_rendering_nests_children() {
        let tree = sample_tree();
        let json = TreeFormatter::format(&tree, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["unique_id"], "[engine:e1]");
        assert_eq!(value["children"][0]["display_name"], "Foo");
        assert_eq!(value["children"][0]["children"][0]["kind"], "test");
    }
}
