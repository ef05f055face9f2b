//! XML utility functions for navigating capacity element trees and reading
//! typed attributes.

use roxmltree::Node;

use crate::config::CAPACITY_TAG;
use crate::error::{DecodeError, Result};
use crate::range::{parse_f64_array, parse_finite, parse_range_table, RangeTable};
use crate::types::AttributeEnum;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use factored_capacity::xml::get_tag_name;
///
/// let xml = r#"<capacity><baseCapacity/></capacity>"#;
/// let doc = Document::parse(xml).unwrap();
/// let base = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(base), "baseCapacity");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find the first descendant element (excluding `node` itself) with the
/// given tag name, in document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use factored_capacity::xml::find_descendant;
///
/// let xml = r#"<influenceFactors><priceElasticity><benchmarkRates/></priceElasticity></influenceFactors>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert!(find_descendant(doc.root_element(), "benchmarkRates").is_some());
/// assert!(find_descendant(doc.root_element(), "influenceFactors").is_none());
/// ```
pub fn find_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .find(|n| n.is_element() && get_tag_name(*n) == tag)
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Slash-separated tag path from the enclosing `<capacity>` down to `node`.
///
/// Falls back to the path from the document element when the node is not
/// inside a capacity.
pub fn element_path(node: Node<'_, '_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        if !n.is_element() {
            break;
        }
        let tag = get_tag_name(n);
        parts.push(tag);
        if tag == CAPACITY_TAG {
            break;
        }
        current = n.parent_element();
    }
    parts.reverse();
    parts.join("/")
}

/// Find a required descendant element.
///
/// # Errors
/// Returns `MissingElement` naming the tag and the path of `node`.
pub fn require_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
) -> Result<Node<'a, 'input>> {
    find_descendant(node, tag).ok_or_else(|| DecodeError::MissingElement {
        element: tag.to_string(),
        context: element_path(node),
    })
}

/// Get a required attribute value.
///
/// # Errors
/// Returns `MissingAttribute` when the attribute is absent.
pub fn require_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| DecodeError::MissingAttribute {
            element: element_path(node),
            attribute: name.to_string(),
        })
}

/// Parse a required attribute as a finite float.
///
/// # Errors
/// Returns `MissingAttribute`, or `InvalidNumber` for non-numeric text,
/// NaN and infinities.
pub fn parse_f64_attribute(node: Node<'_, '_>, name: &str) -> Result<f64> {
    let text = require_attribute(node, name)?;
    parse_finite(text).ok_or_else(|| DecodeError::InvalidNumber {
        element: element_path(node),
        attribute: name.to_string(),
        value: text.to_string(),
    })
}

/// Parse an optional unsigned attribute, falling back to `default`.
///
/// # Errors
/// Returns `InvalidNumber` when the attribute is present but not a
/// non-negative integer.
pub fn parse_u32_attribute_or(node: Node<'_, '_>, name: &str, default: u32) -> Result<u32> {
    match node.attribute(name) {
        None => Ok(default),
        Some(text) => text
            .trim()
            .parse()
            .map_err(|_| DecodeError::InvalidNumber {
                element: element_path(node),
                attribute: name.to_string(),
                value: text.to_string(),
            }),
    }
}

/// Parse a required attribute against the closed set of `T`.
///
/// # Errors
/// Returns `MissingAttribute`, or `InvalidEnum` listing the accepted values.
pub fn parse_enum_attribute<T: AttributeEnum>(node: Node<'_, '_>, name: &str) -> Result<T> {
    let value = require_attribute(node, name)?;
    T::from_attribute(value).ok_or_else(|| DecodeError::InvalidEnum {
        element: element_path(node),
        attribute: name.to_string(),
        value: value.to_string(),
        expected: T::VARIANTS,
    })
}

/// Parse a required range map attribute.
///
/// # Errors
/// Returns `MissingAttribute`, or `InvalidAttribute` wrapping the
/// `MalformedTable` error.
pub fn parse_table_attribute(node: Node<'_, '_>, name: &str) -> Result<RangeTable> {
    let text = require_attribute(node, name)?;
    parse_range_table(text).map_err(|source| DecodeError::InvalidAttribute {
        element: element_path(node),
        attribute: name.to_string(),
        source: Box::new(source),
    })
}

/// Parse a required numeric array attribute.
///
/// # Errors
/// Returns `MissingAttribute`, or `InvalidAttribute` wrapping the
/// `MalformedArray` error.
pub fn parse_array_attribute(node: Node<'_, '_>, name: &str) -> Result<Vec<f64>> {
    let text = require_attribute(node, name)?;
    parse_f64_array(text).map_err(|source| DecodeError::InvalidAttribute {
        element: element_path(node),
        attribute: name.to_string(),
        source: Box::new(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mode {
        Fast,
        Slow,
    }

    impl AttributeEnum for Mode {
        const VARIANTS: &'static [&'static str] = &["FAST", "SLOW"];

        fn from_attribute(value: &str) -> Option<Self> {
            match value {
                "FAST" => Some(Self::Fast),
                "SLOW" => Some(Self::Slow),
                _ => None,
            }
        }

        fn as_str(&self) -> &'static str {
            match self {
                Self::Fast => "FAST",
                Self::Slow => "SLOW",
            }
        }
    }

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:capacity xmlns:ns="http://example.com"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "capacity");
    }

    #[test]
    fn test_find_children() {
        let xml = r#"<root><item/><other/><item/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(find_children(root, "item").count(), 2);
        assert_eq!(element_children(root).count(), 3);
    }

    #[test]
    fn test_find_descendant_is_document_order() {
        let xml = r#"<root><a><x n="1"/></a><x n="2"/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let found = find_descendant(doc.root_element(), "x").unwrap();
        assert_eq!(found.attribute("n"), Some("1"));
    }

    #[test]
    fn test_element_path_stops_at_capacity() {
        let xml = r#"<customers><customer><capacity><influenceFactors><temperature/></influenceFactors></capacity></customer></customers>"#;
        let doc = Document::parse(xml).unwrap();
        let temperature = doc
            .descendants()
            .find(|n| n.has_tag_name("temperature"))
            .unwrap();
        assert_eq!(
            element_path(temperature),
            "capacity/influenceFactors/temperature"
        );
    }

    #[test]
    fn test_element_path_outside_capacity() {
        let xml = r#"<customers><customer/></customers>"#;
        let doc = Document::parse(xml).unwrap();
        let customer = doc.root_element().first_element_child().unwrap();
        assert_eq!(element_path(customer), "customers/customer");
    }

    #[test]
    fn test_require_descendant_missing() {
        let xml = r#"<capacity><baseCapacity/></capacity>"#;
        let doc = Document::parse(xml).unwrap();
        let base = doc.root_element().first_element_child().unwrap();
        match require_descendant(base, "populationCapacity") {
            Err(DecodeError::MissingElement { element, context }) => {
                assert_eq!(element, "populationCapacity");
                assert_eq!(context, "capacity/baseCapacity");
            }
            other => panic!("expected MissingElement, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_f64_attribute() {
        let xml = r#"<heatLoss constant=" 16.0 " perK="abc" inf="inf"/>"#;
        let doc = Document::parse(xml).unwrap();
        let node = doc.root_element();

        assert_eq!(parse_f64_attribute(node, "constant").unwrap(), 16.0);
        assert!(matches!(
            parse_f64_attribute(node, "perK"),
            Err(DecodeError::InvalidNumber { value, .. }) if value == "abc"
        ));
        assert!(matches!(
            parse_f64_attribute(node, "inf"),
            Err(DecodeError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_f64_attribute(node, "missing"),
            Err(DecodeError::MissingAttribute { attribute, .. }) if attribute == "missing"
        ));
    }

    #[test]
    fn test_parse_u32_attribute_or() {
        let xml = r#"<customer count="3" bundleCount="-1"/>"#;
        let doc = Document::parse(xml).unwrap();
        let node = doc.root_element();

        assert_eq!(parse_u32_attribute_or(node, "count", 1).unwrap(), 3);
        assert_eq!(parse_u32_attribute_or(node, "absent", 1).unwrap(), 1);
        assert!(parse_u32_attribute_or(node, "bundleCount", 1).is_err());
    }

    #[test]
    fn test_parse_enum_attribute() {
        let xml = r#"<run mode="FAST" bad="fast"/>"#;
        let doc = Document::parse(xml).unwrap();
        let node = doc.root_element();

        assert_eq!(parse_enum_attribute::<Mode>(node, "mode").unwrap(), Mode::Fast);
        match parse_enum_attribute::<Mode>(node, "bad") {
            Err(DecodeError::InvalidEnum {
                value, expected, ..
            }) => {
                assert_eq!(value, "fast");
                assert_eq!(expected, &["FAST", "SLOW"]);
            }
            other => panic!("expected InvalidEnum, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_table_attribute_wraps_location() {
        let xml = r#"<capacity><windSpeed rangeMap="0:1.0,x"/></capacity>"#;
        let doc = Document::parse(xml).unwrap();
        let node = doc.root_element().first_element_child().unwrap();

        let err = parse_table_attribute(node, "rangeMap").unwrap_err();
        assert!(err.to_string().contains("capacity/windSpeed@rangeMap"));
        assert!(matches!(
            err.root_cause(),
            DecodeError::MalformedTable { token, .. } if token == "x"
        ));
    }

    #[test]
    fn test_parse_array_attribute() {
        let xml = r#"<hourlySkew array="1.0,1.1,0.9"/>"#;
        let doc = Document::parse(xml).unwrap();
        let values = parse_array_attribute(doc.root_element(), "array").unwrap();
        assert_eq!(values, vec![1.0, 1.1, 0.9]);
    }
}
