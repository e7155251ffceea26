//! Builds a resolved [Component] tree out of a screen's raw form.
//!
//! Failures are node local: a node that cannot be resolved is kept and
//! flagged as faulty, and its children are still built. The resulting tree
//! always has the same shape and child order as its source.
use crate::prelude::*;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use unchive_descriptor::descriptor::TypeDescriptor;

#[cfg(test)]
mod tests;

const NAME_KEY: &str = "$Name";
const TYPE_KEY: &str = "$Type";
const COMPONENTS_KEY: &str = "$Components";
const UUID_KEY: &str = "Uuid";

/// Identifier assigned by the designer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Numeric(i64),
    Text(String),
}

impl Default for ComponentId {
    fn default() -> Self {
        ComponentId::Numeric(0)
    }
}

impl ComponentId {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(text)) if !text.is_empty() => text
                .trim()
                .parse()
                .map(ComponentId::Numeric)
                .unwrap_or_else(|_| ComponentId::Text(text.clone())),
            Some(Value::Number(number)) => number
                .as_i64()
                .map(ComponentId::Numeric)
                .unwrap_or_else(|| ComponentId::Text(number.to_string())),
            _ => ComponentId::default(),
        }
    }

    /// Whether the source omitted the id.
    pub fn is_absent(&self) -> bool {
        *self == ComponentId::Numeric(0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Numeric(id) => write!(f, "{id}"),
            ComponentId::Text(id) => f.write_str(id),
        }
    }
}

/// One node of a screen's component tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Instance name, e.g. `Button1`. Empty only on faulty nodes.
    pub name: String,
    /// Short type name, e.g. `Button`. Empty only on faulty nodes.
    pub type_name: String,
    pub id: ComponentId,
    pub origin: Origin,
    pub descriptor: Option<Arc<TypeDescriptor>>,
    pub properties: Vec<ResolvedProperty>,
    pub children: Vec<Component>,
    /// Set when the node's own resolution failed.
    pub faulty: bool,
}

impl Component {
    fn faulty_node(name: String, type_name: String, id: ComponentId) -> Self {
        Self {
            name,
            type_name,
            id,
            origin: Origin::BuiltIn,
            descriptor: None,
            properties: vec![],
            children: vec![],
            faulty: true,
        }
    }

    pub fn property(&self, name: &str) -> Option<&ResolvedProperty> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Pre-order traversal starting at this node.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn count(&self) -> usize {
        self.walk().count()
    }

    /// First node of this subtree, in pre-order, with the given instance name.
    pub fn find(&self, name: &str) -> Option<&Component> {
        self.walk().find(|component| component.name == name)
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a Component>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        let component = self.stack.pop()?;
        self.stack.extend(component.children.iter().rev());
        Some(component)
    }
}

/// Recursively classifies and resolves raw component nodes.
#[derive(Debug, Clone, Copy)]
pub struct ComponentTreeBuilder<'a> {
    classifier: OriginClassifier<'a>,
    config: &'a ResolverConfig,
}

impl<'a> ComponentTreeBuilder<'a> {
    pub fn new(classifier: OriginClassifier<'a>, config: &'a ResolverConfig) -> Self {
        Self { classifier, config }
    }

    /// Builds the tree rooted at `raw`.
    ///
    /// Fails only when the root itself is not an object or has no `$Name`.
    #[tracing::instrument(skip_all)]
    pub fn build(&self, raw: &Value) -> BuildResult<Component> {
        let node = raw.as_object().ok_or(BuildError::RootNotAnObject)?;
        if node.get(NAME_KEY).and_then(Value::as_str).is_none() {
            return Err(BuildError::MissingRootName);
        }

        let root = self.build_node(raw);

        let faulty = root.walk().filter(|component| component.faulty).count();
        if faulty > 0 {
            warn!(root = %root.name, faulty, "Component tree built with faulty nodes");
        } else {
            debug!(root = %root.name, nodes = root.count(), "Component tree built");
        }

        Ok(root)
    }

    fn build_node(&self, raw: &Value) -> Component {
        let Some(node) = raw.as_object() else {
            warn!("Component node is not a JSON object");
            return Component::faulty_node(String::new(), String::new(), ComponentId::default());
        };

        let name = node.get(NAME_KEY).and_then(Value::as_str);
        let type_name = node.get(TYPE_KEY).and_then(Value::as_str);
        let id = ComponentId::from_value(node.get(UUID_KEY));

        let mut component = match (name, type_name) {
            (Some(name), Some(type_name)) => self.resolve_node(name, type_name, id, raw),
            _ => {
                warn!(?name, ?type_name, "Component node is missing its name or type");
                let mut component = Component::faulty_node(
                    name.unwrap_or_default().to_owned(),
                    type_name.unwrap_or_default().to_owned(),
                    id,
                );
                if let Some(type_name) = type_name {
                    let classification = self.classifier.classify(type_name);
                    component.origin = classification.origin;
                    component.descriptor = classification.descriptor;
                }
                component
            }
        };

        match node.get(COMPONENTS_KEY) {
            None | Some(Value::Null) => (),
            Some(Value::Array(children)) => component.children = self.build_children(children),
            Some(_) => {
                warn!(component = %component.name, "`$Components` is not an array");
                component.faulty = true;
            }
        }

        component
    }

    fn resolve_node(
        &self,
        name: &str,
        type_name: &str,
        id: ComponentId,
        raw: &Value,
    ) -> Component {
        let classification = self.classifier.classify(type_name);

        let (properties, faulty) =
            match PropertyResolver::resolve(raw, classification.descriptor.as_deref()) {
                Ok(properties) => (properties, false),
                Err(error) => {
                    warn!(component = name, %error, "Properties could not be resolved");
                    (vec![], true)
                }
            };

        Component {
            name: name.to_owned(),
            type_name: type_name.to_owned(),
            id,
            origin: classification.origin,
            descriptor: classification.descriptor,
            properties,
            children: vec![],
            faulty,
        }
    }

    fn build_children(&self, children: &[Value]) -> Vec<Component> {
        if self.config.runs_parallel() && children.len() > 1 {
            return self.build_children_parallel(children);
        }

        children.iter().map(|child| self.build_node(child)).collect()
    }

    /// Sibling subtrees are independent, so they can be built on the rayon
    /// pool. `collect` on an indexed parallel iterator keeps source order.
    #[cfg(feature = "parallel")]
    fn build_children_parallel(&self, children: &[Value]) -> Vec<Component> {
        use rayon::prelude::*;

        children
            .par_iter()
            .map(|child| self.build_node(child))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn build_children_parallel(&self, children: &[Value]) -> Vec<Component> {
        children.iter().map(|child| self.build_node(child)).collect()
    }
}
