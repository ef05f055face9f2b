//! Capacity descriptor: the decoded form of one `<capacity>` element.

use std::collections::BTreeMap;

use roxmltree::Node;
use serde::Serialize;

use crate::config::{BASE_CAPACITY_TAG, INFLUENCE_FACTORS_TAG};
use crate::error::{DecodeError, Result};
use crate::influence::{ElasticityModel, InfluenceFactor, InfluenceFactors};
use crate::range::RangeTable;
use crate::registry::{CapacityHandle, CapacitySubstructure};
use crate::services::{DecodeContext, Distribution, TimeseriesModel};
use crate::types::AttributeEnum;
use crate::xml::{
    element_children, element_path, get_tag_name, parse_enum_attribute, require_descendant,
};

/// Declared kind of base capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseCapacityType {
    Population,
    Individual,
    Timeseries,
}

impl AttributeEnum for BaseCapacityType {
    const VARIANTS: &'static [&'static str] = &["POPULATION", "INDIVIDUAL", "TIMESERIES"];

    fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "POPULATION" => Some(Self::Population),
            "INDIVIDUAL" => Some(Self::Individual),
            "TIMESERIES" => Some(Self::Timeseries),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Population => "POPULATION",
            Self::Individual => "INDIVIDUAL",
            Self::Timeseries => "TIMESERIES",
        }
    }
}

/// Base capacity model; the variant always matches the declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "model", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseCapacity {
    /// Capacity of the whole population, from `<populationCapacity>`.
    Population(Distribution),
    /// Capacity per individual, from `<individualCapacity>`.
    Individual(Distribution),
    /// Replayed timeseries, from `<timeseriesModel>`.
    Timeseries(TimeseriesModel),
}

impl BaseCapacity {
    #[must_use]
    pub fn capacity_type(&self) -> BaseCapacityType {
        match self {
            Self::Population(_) => BaseCapacityType::Population,
            Self::Individual(_) => BaseCapacityType::Individual,
            Self::Timeseries(_) => BaseCapacityType::Timeseries,
        }
    }

    /// Decode a `<baseCapacity type="..">` section.
    fn decode(owner: &str, node: Node<'_, '_>, ctx: &DecodeContext<'_>) -> Result<Self> {
        let capacity_type: BaseCapacityType = parse_enum_attribute(node, "type")?;
        let base = match capacity_type {
            BaseCapacityType::Population => {
                let element = require_descendant(node, "populationCapacity")?;
                Self::Population(ctx.distributions().build(ctx.services(), owner, element)?)
            }
            BaseCapacityType::Individual => {
                let element = require_descendant(node, "individualCapacity")?;
                Self::Individual(ctx.distributions().build(ctx.services(), owner, element)?)
            }
            BaseCapacityType::Timeseries => {
                let element = require_descendant(node, "timeseriesModel")?;
                Self::Timeseries(ctx.timeseries().build(element)?)
            }
        };
        Ok(base)
    }
}

/// Decoded configuration of one capacity.
///
/// Only [`CapacityDescriptor::decode`] creates descriptors, so every
/// instance is fully populated and read-only afterwards.
#[derive(Debug)]
pub struct CapacityDescriptor {
    name: String,
    description: String,
    base_capacity: BaseCapacity,
    influence: InfluenceFactors,
    substructures: BTreeMap<String, Box<dyn CapacitySubstructure>>,
}

impl CapacityDescriptor {
    /// Decode a `<capacity>` element.
    ///
    /// Direct children are handled in document order: `baseCapacity` and
    /// `influenceFactors` are decoded here, every other tag goes to the
    /// substructure registry. Tags the registry does not know are logged and
    /// skipped. Both fixed sections are required.
    ///
    /// # Errors
    /// Returns `DecodeError::Capacity` naming this capacity and wrapping the
    /// first fatal error.
    pub fn decode(
        name: impl Into<String>,
        node: Node<'_, '_>,
        ctx: &DecodeContext<'_>,
    ) -> Result<Self> {
        let name = name.into();
        let _span = tracing::debug_span!("capacity", capacity = %name).entered();

        Self::decode_sections(&name, node, ctx).map_err(|source| DecodeError::Capacity {
            name: name.clone(),
            source: Box::new(source),
        })
    }

    fn decode_sections(name: &str, node: Node<'_, '_>, ctx: &DecodeContext<'_>) -> Result<Self> {
        let mut base_capacity = None;
        let mut influence = None;
        let mut substructures: BTreeMap<String, Box<dyn CapacitySubstructure>> = BTreeMap::new();

        for child in element_children(node) {
            let tag = get_tag_name(child);
            match tag {
                BASE_CAPACITY_TAG => {
                    let decoded = BaseCapacity::decode(name, child, ctx)?;
                    if base_capacity.replace(decoded).is_some() {
                        tracing::warn!(tag, "Repeated section, keeping the last one");
                    }
                }
                INFLUENCE_FACTORS_TAG => {
                    let decoded = InfluenceFactors::decode(child)?;
                    if influence.replace(decoded).is_some() {
                        tracing::warn!(tag, "Repeated section, keeping the last one");
                    }
                }
                _ => {
                    let owner = CapacityHandle::new(name, ctx.services());
                    match ctx.registry().create(tag, &owner) {
                        Ok(mut substructure) => {
                            substructure.decode(child)?;
                            if substructures.insert(tag.to_string(), substructure).is_some() {
                                tracing::warn!(tag, "Repeated substructure, keeping the last one");
                            }
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, tag, "Skipping capacity element");
                        }
                    }
                }
            }
        }

        let missing = |element: &str| DecodeError::MissingElement {
            element: element.to_string(),
            context: element_path(node),
        };
        let base_capacity = base_capacity.ok_or_else(|| missing(BASE_CAPACITY_TAG))?;
        let influence = influence.ok_or_else(|| missing(INFLUENCE_FACTORS_TAG))?;

        tracing::debug!(
            base = base_capacity.capacity_type().as_str(),
            substructures = substructures.len(),
            "Decoded capacity"
        );

        Ok(Self {
            name: name.to_string(),
            description: node.attribute("description").unwrap_or_default().to_string(),
            base_capacity,
            influence,
            substructures,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `description` attribute, empty when absent.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn base_capacity(&self) -> &BaseCapacity {
        &self.base_capacity
    }

    #[must_use]
    pub fn influence(&self) -> &InfluenceFactors {
        &self.influence
    }

    #[must_use]
    pub fn daily_skew(&self) -> &[f64] {
        self.influence.daily_skew()
    }

    #[must_use]
    pub fn hourly_skew(&self) -> &[f64] {
        self.influence.hourly_skew()
    }

    #[must_use]
    pub fn temperature(&self) -> &InfluenceFactor {
        self.influence.temperature()
    }

    #[must_use]
    pub fn wind_speed(&self) -> &InfluenceFactor {
        self.influence.wind_speed()
    }

    #[must_use]
    pub fn wind_direction(&self) -> &InfluenceFactor {
        self.influence.wind_direction()
    }

    #[must_use]
    pub fn cloud_cover(&self) -> &InfluenceFactor {
        self.influence.cloud_cover()
    }

    #[must_use]
    pub fn benchmark_rates(&self) -> &RangeTable {
        self.influence.benchmark_rates()
    }

    #[must_use]
    pub fn elasticity_model(&self) -> &ElasticityModel {
        self.influence.elasticity_model()
    }

    #[must_use]
    pub fn curtailment_shifts(&self) -> Option<&[f64]> {
        self.influence.curtailment_shifts()
    }

    /// Substructures by tag, in tag order.
    #[must_use]
    pub fn substructures(&self) -> &BTreeMap<String, Box<dyn CapacitySubstructure>> {
        &self.substructures
    }

    /// Substructure registered under `tag`.
    #[must_use]
    pub fn substructure(&self, tag: &str) -> Option<&dyn CapacitySubstructure> {
        self.substructures.get(tag).map(|s| s.as_ref())
    }

    /// Substructure under `tag`, if it is of type `T`.
    #[must_use]
    pub fn substructure_as<T: 'static>(&self, tag: &str) -> Option<&T> {
        self.substructure(tag)?.as_any().downcast_ref::<T>()
    }
}
