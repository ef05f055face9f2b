//! Owned snapshot of an element subtree.

use roxmltree::Node;
use serde::{Serialize, Serializer};

use super::utils::{element_children, get_tag_name};

/// An element captured out of the source document.
///
/// Used for parts of the configuration that are interpreted downstream
/// (elasticity models, distributions, timeseries), so the decoded model does
/// not borrow from the document it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawElement {
    /// Tag name without namespace.
    pub tag: String,

    /// Attributes as `(name, value)` in document order.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_attributes"
    )]
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawElement>,
}

impl RawElement {
    /// Capture `node` and all of its descendant elements.
    #[must_use]
    pub fn capture(node: Node<'_, '_>) -> Self {
        Self {
            tag: get_tag_name(node).to_string(),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            children: element_children(node).map(Self::capture).collect(),
        }
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First child with the given tag.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&RawElement> {
        self.children.iter().find(|c| c.tag == tag)
    }
}

/// Attributes render as a mapping, keeping document order.
fn serialize_attributes<S: Serializer>(
    attributes: &[(String, String)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(attributes.iter().map(|(n, v)| (n, v)))
}
