use crate::descriptor::{DescriptorTree, UniqueId};
use crate::discovery::DiscoveryDriver;
use crate::error::{Result, SelectorError};
use crate::model::ElementRegistry;
use tracing::warn;

/// What one discovery request asks to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoverySelector {
    /// A container by qualified name.
    Container(String),
    /// A method by declaring container and method name. Overloads all
    /// resolve.
    Method { container: String, method: String },
    /// A previously recorded hierarchical identifier.
    UniqueId(UniqueId),
}

impl DiscoverySelector {
    /// Parses the textual selector forms `class:<fqn>`,
    /// `method:<fqn>#<name>` and `uid:<rendered unique id>`.
    pub fn parse(input: &str) -> std::result::Result<Self, SelectorError> {
        if let Some(name) = input.strip_prefix("class:") {
            return Ok(Self::Container(name.to_string()));
        }
        if let Some(rest) = input.strip_prefix("method:") {
            let Some((container, method)) = rest.split_once('#') else {
                return Err(SelectorError::malformed_method(input));
            };
            if container.is_empty() || method.is_empty() {
                return Err(SelectorError::malformed_method(input));
            }
            return Ok(Self::Method {
                container: container.to_string(),
                method: method.to_string(),
            });
        }
        if let Some(rendered) = input.strip_prefix("uid:") {
            let unique_id = rendered
                .parse()
                .map_err(|e: crate::descriptor::ParseUniqueIdError| {
                    SelectorError::malformed_unique_id(rendered, e.to_string())
                })?;
            return Ok(Self::UniqueId(unique_id));
        }
        Err(SelectorError::unknown_kind(input))
    }
}

/// Runs one full discovery pass for one engine: every selector is resolved
/// into the same tree, selectors that fail to load log and discovery moves
/// on.
pub fn discover(
    registry: &ElementRegistry,
    engine_id: &str,
    display_name: &str,
    selectors: &[DiscoverySelector],
) -> Result<DescriptorTree> {
    let mut tree = DescriptorTree::new(engine_id, display_name);
    let driver = DiscoveryDriver::new(registry);

    for selector in selectors {
        match selector {
            DiscoverySelector::Container(name) => match registry.load_container(name) {
                Some(container) => driver.resolve_container(&mut tree, container)?,
                None => warn!("Container '{name}' could not be loaded."),
            },
            DiscoverySelector::Method { container, method } => {
                let Some(container_model) = registry.load_container(container) else {
                    warn!("Container '{container}' could not be loaded.");
                    continue;
                };
                let methods = container_model.find_method(method);
                if methods.is_empty() {
                    warn!("Method '{container}#{method}' could not be loaded.");
                }
                for method_model in methods {
                    driver.resolve_method(&mut tree, container_model, method_model)?;
                }
            }
            DiscoverySelector::UniqueId(unique_id) => {
                driver.resolve_unique_id(&mut tree, unique_id)?;
            }
        }
    }
    Ok(tree)
}
