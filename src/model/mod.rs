// In-memory structural model of the codebase under discovery.
//
// Stands in for the reflection/classloading layer: containers and methods
// are plain data records carrying string markers, and every lookup that can
// miss returns an Option instead of failing.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Marker a method must carry to be claimed as a test.
pub const TEST_MARKER: &str = "test";
/// Marker selecting the template-container descriptor subtype.
pub const TEMPLATE_MARKER: &str = "container-template";
/// Markers with this prefix become descriptor tags.
pub const TAG_MARKER_PREFIX: &str = "tag:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Package,
    Private,
}

impl Visibility {
    fn public() -> Self {
        Self::Public
    }

    pub fn is_private(self) -> bool {
        self == Self::Private
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodModel {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default = "Visibility::public")]
    pub visibility: Visibility,
    #[serde(default)]
    pub markers: BTreeSet<String>,
}

impl MethodModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            visibility: Visibility::Public,
            markers: BTreeSet::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    /// `name(param, param)` form used as the identifier segment value and
    /// display name of method descriptors.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameters.join(", "))
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn tags(&self) -> BTreeSet<String> {
        tags_from_markers(&self.markers)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerModel {
    /// Qualified name, nested containers separated from their enclosing
    /// container with `$` (`com.example.Outer$Inner`).
    pub qualified_name: String,
    /// Qualified name of the declaring container, if any.
    #[serde(default)]
    pub enclosing: Option<String>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default = "Visibility::public")]
    pub visibility: Visibility,
    #[serde(default)]
    pub markers: BTreeSet<String>,
    #[serde(default)]
    pub methods: Vec<MethodModel>,
    /// Qualified names of directly nested containers.
    #[serde(default)]
    pub nested: Vec<String>,
}

impl ContainerModel {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            enclosing: None,
            is_abstract: false,
            visibility: Visibility::Public,
            markers: BTreeSet::new(),
            methods: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn with_enclosing(mut self, enclosing: impl Into<String>) -> Self {
        self.enclosing = Some(enclosing.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn abstract_container(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    pub fn with_method(mut self, method: MethodModel) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_nested(mut self, nested: impl Into<String>) -> Self {
        self.nested.push(nested.into());
        self
    }

    /// Last component of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit(['$', '.'])
            .next()
            .unwrap_or(&self.qualified_name)
    }

    pub fn is_nested(&self) -> bool {
        self.enclosing.is_some()
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn tags(&self) -> BTreeSet<String> {
        tags_from_markers(&self.markers)
    }

    pub fn find_method(&self, name: &str) -> Vec<&MethodModel> {
        self.methods.iter().filter(|m| m.name == name).collect()
    }

    pub fn find_method_by_signature(&self, signature: &str) -> Option<&MethodModel> {
        self.methods.iter().find(|m| m.signature() == signature)
    }
}

fn tags_from_markers(markers: &BTreeSet<String>) -> BTreeSet<String> {
    markers
        .iter()
        .filter_map(|m| m.strip_prefix(TAG_MARKER_PREFIX))
        .map(str::to_string)
        .collect()
}

/// A top-level container candidate: concrete, not private, not nested.
pub fn is_potential_container(container: &ContainerModel) -> bool {
    !container.is_abstract && !container.visibility.is_private() && !container.is_nested()
}

/// A nested container candidate: concrete, not private, declared inside
/// another container.
pub fn is_nested_container(container: &ContainerModel) -> bool {
    !container.is_abstract && !container.visibility.is_private() && container.is_nested()
}

/// Whether a method can be claimed as a test at all.
pub fn is_testable_method(method: &MethodModel) -> bool {
    !method.visibility.is_private() && method.has_marker(TEST_MARKER)
}

/// The set of structural units discovery can resolve against, addressable by
/// qualified name. Loading a name that is absent is an ordinary miss, never
/// an error.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ElementRegistry {
    containers: Vec<ContainerModel>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(&mut self, container: ContainerModel) {
        self.containers.push(container);
    }

    pub fn containers(&self) -> &[ContainerModel] {
        &self.containers
    }

    /// The load-by-qualified-name capability.
    pub fn load_container(&self, qualified_name: &str) -> Option<&ContainerModel> {
        self.containers
            .iter()
            .find(|c| c.qualified_name == qualified_name)
    }

    pub fn enclosing_of(&self, container: &ContainerModel) -> Option<&ContainerModel> {
        container
            .enclosing
            .as_deref()
            .and_then(|name| self.load_container(name))
    }

    /// Directly declared methods visible to discovery, in declaration order.
    pub fn candidate_methods<'a>(&self, container: &'a ContainerModel) -> Vec<&'a MethodModel> {
        container
            .methods
            .iter()
            .filter(|m| !m.visibility.is_private())
            .collect()
    }

    /// Directly nested container candidates, in declaration order. Nested
    /// names that do not resolve in the registry are skipped.
    pub fn nested_containers(&self, container: &ContainerModel) -> Vec<&ContainerModel> {
        container
            .nested
            .iter()
            .filter_map(|name| self.load_container(name))
            .filter(|c| is_nested_container(c))
            .collect()
    }

    /// Checks that every `nested` and `enclosing` reference resolves.
    pub fn validate(&self) -> Result<(), ModelError> {
        for container in &self.containers {
            for nested in &container.nested {
                if self.load_container(nested).is_none() {
                    return Err(ModelError::dangling_nested(
                        container.qualified_name.clone(),
                        nested.clone(),
                    ));
                }
            }
            if let Some(enclosing) = &container.enclosing {
                if self.load_container(enclosing).is_none() {
                    return Err(ModelError::dangling_nested(
                        enclosing.clone(),
                        container.qualified_name.clone(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn from_json_str(path: &str, json: &str) -> Result<Self, ModelError> {
        let registry: Self = serde_json::from_str(json)
            .map_err(|e| ModelError::malformed(path, e.to_string()))?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let rendered = path.display().to_string();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ModelError::unreadable(rendered.clone(), e.to_string()))?;
        Self::from_json_str(&rendered, &json)
    }
}
