//! YAML writer for customer sets.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::customer::{CapacityBundle, CustomerSet, CustomerStructure, EntityType};
use crate::descriptor::{BaseCapacity, CapacityDescriptor};
use crate::error::Result;
use crate::influence::InfluenceFactors;

/// Capacity representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlCapacity<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    base_capacity: &'a BaseCapacity,
    influence_factors: &'a InfluenceFactors,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    substructures: BTreeMap<&'a str, serde_yaml_ng::Value>,
}

impl<'a> YamlCapacity<'a> {
    fn new(capacity: &'a CapacityDescriptor) -> Result<Self> {
        let substructures = capacity
            .substructures()
            .iter()
            .map(|(tag, sub)| Ok((tag.as_str(), sub.to_yaml_value()?)))
            .collect::<Result<_>>()?;

        Ok(Self {
            name: capacity.name(),
            description: Some(capacity.description()).filter(|d| !d.is_empty()),
            base_capacity: capacity.base_capacity(),
            influence_factors: capacity.influence(),
            substructures,
        })
    }
}

/// Bundle representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlBundle<'a> {
    name: &'a str,
    capacities: Vec<YamlCapacity<'a>>,
}

impl<'a> YamlBundle<'a> {
    fn new(bundle: &'a CapacityBundle) -> Result<Self> {
        Ok(Self {
            name: &bundle.name,
            capacities: bundle
                .capacities
                .iter()
                .map(YamlCapacity::new)
                .collect::<Result<_>>()?,
        })
    }
}

/// Customer representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlCustomer<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    creator_key: Option<&'a str>,
    count: u32,
    bundle_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<EntityType>,
    bundles: Vec<YamlBundle<'a>>,
}

impl<'a> YamlCustomer<'a> {
    fn new(customer: &'a CustomerStructure) -> Result<Self> {
        Ok(Self {
            name: &customer.name,
            creator_key: customer.creator_key.as_deref(),
            count: customer.count,
            bundle_count: customer.bundle_count,
            entity_type: customer.entity_type,
            bundles: customer
                .bundles
                .iter()
                .map(YamlBundle::new)
                .collect::<Result<_>>()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct YamlRejected<'a> {
    name: &'a str,
    error: String,
}

/// Full document representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlCustomerSet<'a> {
    customers: Vec<YamlCustomer<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejected: Vec<YamlRejected<'a>>,
}

/// Indent block sequences under their parent key.
///
/// serde_yaml_ng places `- ` items at the same column as the key that owns
/// them; this shifts every open sequence level two columns to the right.
fn indent_yaml_sequences(yaml: &str) -> String {
    let mut lines = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for line in yaml.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            lines.push(String::new());
            continue;
        }

        let indent = line.len() - trimmed.len();
        let is_item = trimmed.starts_with("- ");
        while open
            .last()
            .is_some_and(|&level| indent < level || (indent == level && !is_item))
        {
            open.pop();
        }
        if is_item && open.last() != Some(&indent) {
            open.push(indent);
        }

        lines.push(format!("{}{trimmed}", " ".repeat(indent + open.len() * 2)));
    }

    lines.join("\n")
}

/// Render a customer set as a YAML document.
///
/// Substructures are rendered through their own
/// [`to_yaml_value`](crate::registry::CapacitySubstructure::to_yaml_value).
///
/// # Errors
/// Returns `YamlSerialization` if any part fails to serialize.
pub fn generate_yaml(set: &CustomerSet) -> Result<String> {
    let document = YamlCustomerSet {
        customers: set
            .customers
            .iter()
            .map(YamlCustomer::new)
            .collect::<Result<_>>()?,
        rejected: set
            .rejected
            .iter()
            .map(|r| YamlRejected {
                name: &r.name,
                error: r.error.to_string(),
            })
            .collect(),
    };

    let yaml = indent_yaml_sequences(&serde_yaml_ng::to_string(&document)?);
    let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Write a customer set to `path` as YAML.
///
/// Writes to a temp file beside `path`, syncs it, then renames it over the
/// destination so a crash never leaves a half-written file behind.
///
/// # Errors
/// Returns `Io` on filesystem failures, otherwise as [`generate_yaml`].
pub fn save_yaml(set: &CustomerSet, path: &Path) -> Result<()> {
    let content = generate_yaml(set)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "customers.yaml".to_string());
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    tracing::debug!(path = %path.display(), "Saved customer YAML");
    Ok(())
}
