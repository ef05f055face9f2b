//! Customer documents: customers, their capacity bundles, and the capacities
//! inside them.

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use serde::Serialize;

use crate::config::{CAPACITY_BUNDLE_TAG, CAPACITY_TAG, CUSTOMER_TAG, DEFAULT_CUSTOMER_COUNT};
use crate::descriptor::CapacityDescriptor;
use crate::error::{DecodeError, Result};
use crate::services::DecodeContext;
use crate::types::AttributeEnum;
use crate::xml::{
    find_children, get_tag_name, parse_enum_attribute, parse_u32_attribute_or, require_attribute,
};

/// Kind of customer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Residential,
    Commercial,
    Industrial,
}

impl AttributeEnum for EntityType {
    const VARIANTS: &'static [&'static str] = &["RESIDENTIAL", "COMMERCIAL", "INDUSTRIAL"];

    fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "RESIDENTIAL" => Some(Self::Residential),
            "COMMERCIAL" => Some(Self::Commercial),
            "INDUSTRIAL" => Some(Self::Industrial),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "RESIDENTIAL",
            Self::Commercial => "COMMERCIAL",
            Self::Industrial => "INDUSTRIAL",
        }
    }
}

/// Capacities grouped under one `<capacityBundle>`.
#[derive(Debug)]
pub struct CapacityBundle {
    pub name: String,
    pub capacities: Vec<CapacityDescriptor>,
}

/// Decoded `<customer>` element.
#[derive(Debug)]
pub struct CustomerStructure {
    pub name: String,
    pub creator_key: Option<String>,
    pub count: u32,
    pub bundle_count: u32,
    pub entity_type: Option<EntityType>,
    pub bundles: Vec<CapacityBundle>,
}

impl CustomerStructure {
    /// Decode a customer and every capacity it contains.
    ///
    /// # Errors
    /// Fails on the first invalid customer attribute or capacity.
    pub fn decode(node: Node<'_, '_>, ctx: &DecodeContext<'_>) -> Result<Self> {
        let name = require_attribute(node, "name")?.to_string();
        let entity_type = match node.attribute("entityType") {
            Some(_) => Some(parse_enum_attribute::<EntityType>(node, "entityType")?),
            None => None,
        };

        let bundles = find_children(node, CAPACITY_BUNDLE_TAG)
            .map(|bundle| decode_bundle(&name, bundle, ctx))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            creator_key: node.attribute("creatorKey").map(String::from),
            count: parse_u32_attribute_or(node, "count", DEFAULT_CUSTOMER_COUNT)?,
            bundle_count: parse_u32_attribute_or(node, "bundleCount", DEFAULT_CUSTOMER_COUNT)?,
            entity_type,
            bundles,
            name,
        })
    }

    /// All capacities across bundles, in document order.
    pub fn capacities(&self) -> impl Iterator<Item = &CapacityDescriptor> {
        self.bundles.iter().flat_map(|b| b.capacities.iter())
    }
}

/// Capacities are named by their `name` attribute, or `<bundle>-<index>`.
fn decode_bundle(
    customer: &str,
    node: Node<'_, '_>,
    ctx: &DecodeContext<'_>,
) -> Result<CapacityBundle> {
    let name = node.attribute("name").unwrap_or(customer).to_string();
    let capacities = find_children(node, CAPACITY_TAG)
        .enumerate()
        .map(|(index, capacity)| {
            let capacity_name = capacity
                .attribute("name")
                .map(String::from)
                .unwrap_or_else(|| format!("{name}-{index}"));
            CapacityDescriptor::decode(capacity_name, capacity, ctx)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CapacityBundle { name, capacities })
}

/// A customer that could not be decoded, kept out of the simulation.
#[derive(Debug)]
pub struct RejectedCustomer {
    pub name: String,
    pub error: DecodeError,
}

/// Result of loading a customers document.
#[derive(Debug, Default)]
pub struct CustomerSet {
    pub customers: Vec<CustomerStructure>,
    pub rejected: Vec<RejectedCustomer>,
}

impl CustomerSet {
    /// Find a decoded customer by name.
    #[must_use]
    pub fn customer(&self, name: &str) -> Option<&CustomerStructure> {
        self.customers.iter().find(|c| c.name == name)
    }
}

/// Load every customer from a customers document.
///
/// The root is either `<customers>` holding `<customer>` elements or a
/// single `<customer>`. A customer that fails to decode is logged and
/// recorded in [`CustomerSet::rejected`]; the others are still returned.
///
/// # Errors
/// Returns `Xml` when the document itself cannot be parsed.
pub fn load_customers(xml: &str, ctx: &DecodeContext<'_>) -> Result<CustomerSet> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    let nodes: Vec<Node<'_, '_>> = if get_tag_name(root) == CUSTOMER_TAG {
        vec![root]
    } else {
        find_children(root, CUSTOMER_TAG).collect()
    };

    let mut set = CustomerSet::default();
    for (index, node) in nodes.into_iter().enumerate() {
        match CustomerStructure::decode(node, ctx) {
            Ok(customer) => {
                tracing::debug!(
                    customer = %customer.name,
                    capacities = customer.capacities().count(),
                    "Loaded customer"
                );
                set.customers.push(customer);
            }
            Err(error) => {
                let name = node
                    .attribute("name")
                    .map(String::from)
                    .unwrap_or_else(|| format!("customer #{index}"));
                tracing::error!(customer = %name, error = %error, "Rejected customer");
                set.rejected.push(RejectedCustomer { name, error });
            }
        }
    }

    Ok(set)
}

/// Read and load a customers document from disk.
///
/// # Errors
/// Returns `Io` when the file cannot be read, otherwise as [`load_customers`].
pub fn load_customers_file(path: &Path, ctx: &DecodeContext<'_>) -> Result<CustomerSet> {
    tracing::debug!(path = %path.display(), "Loading customers file");
    let xml = fs::read_to_string(path)?;
    load_customers(&xml, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SeedRepo;

    const CAPACITY_BODY: &str = r#"
        <baseCapacity type="INDIVIDUAL"><individualCapacity distribution="DEGENERATE" value="4"/></baseCapacity>
        <influenceFactors>
            <dailySkew array="1,1,1,1,1,1,1"/>
            <hourlySkew array="1"/>
            <temperature influence="NONE"/>
            <windSpeed influence="NONE"/>
            <windDirection influence="NONE"/>
            <cloudCover influence="NONE"/>
            <priceElasticity>
                <benchmarkRates rangeMap="0~23:0.1"/>
                <elasticityModel type="CONTINUOUS"/>
            </priceElasticity>
        </influenceFactors>"#;

    fn load(xml: &str) -> CustomerSet {
        let repo = SeedRepo::default();
        load_customers(xml, &DecodeContext::new(&repo)).unwrap()
    }

    #[test]
    fn test_load_customer_attributes_and_naming() {
        let xml = format!(
            r#"<customers>
                <customer name="Village" creatorKey="village" count="3" entityType="RESIDENTIAL">
                    <capacityBundle>
                        <capacity>{CAPACITY_BODY}</capacity>
                        <capacity name="heating">{CAPACITY_BODY}</capacity>
                    </capacityBundle>
                </customer>
            </customers>"#
        );
        let set = load(&xml);

        assert!(set.rejected.is_empty());
        let customer = set.customer("Village").unwrap();
        assert_eq!(customer.creator_key.as_deref(), Some("village"));
        assert_eq!(customer.count, 3);
        assert_eq!(customer.bundle_count, 1);
        assert_eq!(customer.entity_type, Some(EntityType::Residential));

        let names: Vec<&str> = customer.capacities().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Village-0", "heating"]);
    }

    #[test]
    fn test_single_customer_root() {
        let xml = format!(
            r#"<customer name="Solo"><capacityBundle name="main"><capacity>{CAPACITY_BODY}</capacity></capacityBundle></customer>"#
        );
        let set = load(&xml);
        assert_eq!(set.customers.len(), 1);
        assert_eq!(set.customers[0].bundles[0].name, "main");
        assert_eq!(set.customers[0].bundles[0].capacities[0].name(), "main-0");
    }

    #[test]
    fn test_failed_customer_is_rejected_others_load() {
        let broken = CAPACITY_BODY.replace(r#"type="CONTINUOUS""#, r#"type="ELASTIC""#);
        let xml = format!(
            r#"<customers>
                <customer name="Good"><capacityBundle><capacity>{CAPACITY_BODY}</capacity></capacityBundle></customer>
                <customer name="Bad"><capacityBundle><capacity name="broken">{broken}</capacity></capacityBundle></customer>
                <customer entityType="FARM"/>
            </customers>"#
        );
        let set = load(&xml);

        assert_eq!(set.customers.len(), 1);
        assert_eq!(set.customers[0].name, "Good");

        assert_eq!(set.rejected.len(), 2);
        assert_eq!(set.rejected[0].name, "Bad");
        let message = set.rejected[0].error.to_string();
        assert!(message.contains("Capacity 'broken'"), "{message}");
        assert!(message.contains("elasticityModel@type"), "{message}");
        assert_eq!(set.rejected[1].name, "customer #2");
        assert!(matches!(
            set.rejected[1].error,
            DecodeError::MissingAttribute { ref attribute, .. } if attribute == "name"
        ));
    }

    #[test]
    fn test_invalid_entity_type() {
        let set = load(r#"<customers><customer name="Farm" entityType="FARM"/></customers>"#);
        assert!(matches!(
            set.rejected[0].error,
            DecodeError::InvalidEnum { ref value, .. } if value == "FARM"
        ));
    }

    #[test]
    fn test_concurrent_loads_share_registry() {
        let xml = format!(
            r#"<customer name="Shared"><capacityBundle><capacity>{CAPACITY_BODY}</capacity></capacityBundle></customer>"#
        );
        let repo = SeedRepo::default();
        let ctx = DecodeContext::new(&repo);

        let counts: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| load_customers(&xml, &ctx).unwrap().customers.len()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(counts, vec![1; 4]);
    }

    #[test]
    fn test_malformed_document() {
        let repo = SeedRepo::default();
        let result = load_customers("<customers>", &DecodeContext::new(&repo));
        assert!(matches!(result, Err(DecodeError::Xml(_))));
    }

    #[test]
    fn test_missing_file() {
        let repo = SeedRepo::default();
        let result = load_customers_file(
            Path::new("/nonexistent/customers.xml"),
            &DecodeContext::new(&repo),
        );
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }
}
