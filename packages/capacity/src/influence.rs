//! Influence factors of a capacity: skew curves, weather influences, price
//! elasticity and curtailment.

use roxmltree::Node;
use serde::Serialize;

use crate::error::Result;
use crate::range::RangeTable;
use crate::types::AttributeEnum;
use crate::xml::{
    find_descendant, parse_array_attribute, parse_enum_attribute, parse_f64_attribute,
    parse_table_attribute, require_descendant, RawElement,
};

/// How an external factor modifies base capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InfluenceKind {
    /// The table value is applied for the observed factor value.
    Direct,
    /// The table is keyed by deviation from a reference value.
    Deviation,
    /// The factor has no influence.
    None,
}

impl AttributeEnum for InfluenceKind {
    const VARIANTS: &'static [&'static str] = &["DIRECT", "DEVIATION", "NONE"];

    fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "DIRECT" => Some(Self::Direct),
            "DEVIATION" => Some(Self::Deviation),
            "NONE" => Some(Self::None),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "DIRECT",
            Self::Deviation => "DEVIATION",
            Self::None => "NONE",
        }
    }
}

/// Price-responsiveness model choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElasticityModelType {
    Continuous,
    Stepwise,
}

impl AttributeEnum for ElasticityModelType {
    const VARIANTS: &'static [&'static str] = &["CONTINUOUS", "STEPWISE"];

    fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "CONTINUOUS" => Some(Self::Continuous),
            "STEPWISE" => Some(Self::Stepwise),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Continuous => "CONTINUOUS",
            Self::Stepwise => "STEPWISE",
        }
    }
}

/// One weather influence.
///
/// The table is empty exactly when the kind is `None`. Only the temperature
/// factor carries a reference, and only for `Deviation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluenceFactor {
    kind: InfluenceKind,
    #[serde(skip_serializing_if = "RangeTable::is_empty")]
    table: RangeTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<f64>,
}

impl InfluenceFactor {
    /// A factor without influence.
    #[must_use]
    pub fn none() -> Self {
        Self {
            kind: InfluenceKind::None,
            table: RangeTable::new(),
            reference: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> InfluenceKind {
        self.kind
    }

    /// Lookup table keyed by the factor's domain value.
    #[must_use]
    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    /// Reference temperature of a deviation-kind temperature factor.
    #[must_use]
    pub fn reference(&self) -> Option<f64> {
        self.reference
    }

    /// Whether the factor influences capacity at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.kind != InfluenceKind::None
    }

    /// Decode `<tag influence=".." {map_attribute}="..">` under `section`.
    fn decode(section: Node<'_, '_>, tag: &str, map_attribute: &str) -> Result<Self> {
        let node = require_descendant(section, tag)?;
        let kind: InfluenceKind = parse_enum_attribute(node, "influence")?;
        if kind == InfluenceKind::None {
            return Ok(Self::none());
        }

        Ok(Self {
            kind,
            table: parse_table_attribute(node, map_attribute)?,
            reference: None,
        })
    }

    /// Temperature additionally requires `reference` for the deviation kind.
    fn decode_temperature(section: Node<'_, '_>) -> Result<Self> {
        let mut factor = Self::decode(section, "temperature", "rangeMap")?;
        if factor.kind == InfluenceKind::Deviation {
            let node = require_descendant(section, "temperature")?;
            factor.reference = Some(parse_f64_attribute(node, "reference")?);
        }
        Ok(factor)
    }
}

/// Elasticity model, validated but left for the pricing side to interpret.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElasticityModel {
    kind: ElasticityModelType,
    element: RawElement,
}

impl ElasticityModel {
    #[must_use]
    pub fn kind(&self) -> ElasticityModelType {
        self.kind
    }

    /// The `<elasticityModel>` element as configured.
    #[must_use]
    pub fn element(&self) -> &RawElement {
        &self.element
    }
}

/// Everything decoded from `<influenceFactors>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluenceFactors {
    daily_skew: Vec<f64>,
    hourly_skew: Vec<f64>,
    temperature: InfluenceFactor,
    wind_speed: InfluenceFactor,
    wind_direction: InfluenceFactor,
    cloud_cover: InfluenceFactor,
    benchmark_rates: RangeTable,
    elasticity_model: ElasticityModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    curtailment_shifts: Option<Vec<f64>>,
}

impl InfluenceFactors {
    /// Decode an `<influenceFactors>` section.
    ///
    /// Order: skews, temperature, wind speed, wind direction, cloud cover,
    /// price elasticity, then the optional curtailment.
    ///
    /// # Errors
    /// Returns the first missing, malformed or out-of-set value.
    pub fn decode(node: Node<'_, '_>) -> Result<Self> {
        let daily_skew = parse_array_attribute(require_descendant(node, "dailySkew")?, "array")?;
        let hourly_skew = parse_array_attribute(require_descendant(node, "hourlySkew")?, "array")?;

        let temperature = InfluenceFactor::decode_temperature(node)?;
        let wind_speed = InfluenceFactor::decode(node, "windSpeed", "rangeMap")?;
        let wind_direction = InfluenceFactor::decode(node, "windDirection", "rangeMap")?;
        let cloud_cover = InfluenceFactor::decode(node, "cloudCover", "percentMap")?;

        let price_elasticity = require_descendant(node, "priceElasticity")?;
        let benchmark_rates = parse_table_attribute(
            require_descendant(price_elasticity, "benchmarkRates")?,
            "rangeMap",
        )?;
        let model = require_descendant(price_elasticity, "elasticityModel")?;
        let elasticity_model = ElasticityModel {
            kind: parse_enum_attribute(model, "type")?,
            element: RawElement::capture(model),
        };

        let curtailment_shifts = find_descendant(node, "curtailment")
            .map(|c| parse_array_attribute(c, "shifts"))
            .transpose()?;

        tracing::debug!(
            temperature = temperature.kind.as_str(),
            wind_speed = wind_speed.kind.as_str(),
            wind_direction = wind_direction.kind.as_str(),
            cloud_cover = cloud_cover.kind.as_str(),
            elasticity = elasticity_model.kind.as_str(),
            curtailment = curtailment_shifts.is_some(),
            "Decoded influence factors"
        );

        Ok(Self {
            daily_skew,
            hourly_skew,
            temperature,
            wind_speed,
            wind_direction,
            cloud_cover,
            benchmark_rates,
            elasticity_model,
            curtailment_shifts,
        })
    }

    /// Multipliers by day index.
    #[must_use]
    pub fn daily_skew(&self) -> &[f64] {
        &self.daily_skew
    }

    /// Multipliers by hour index.
    #[must_use]
    pub fn hourly_skew(&self) -> &[f64] {
        &self.hourly_skew
    }

    /// Keyed by degrees Celsius.
    #[must_use]
    pub fn temperature(&self) -> &InfluenceFactor {
        &self.temperature
    }

    /// Keyed by m/s.
    #[must_use]
    pub fn wind_speed(&self) -> &InfluenceFactor {
        &self.wind_speed
    }

    /// Keyed by angle, 0 to 360.
    #[must_use]
    pub fn wind_direction(&self) -> &InfluenceFactor {
        &self.wind_direction
    }

    /// Keyed by percent, 0 (clear) to 100 (overcast).
    #[must_use]
    pub fn cloud_cover(&self) -> &InfluenceFactor {
        &self.cloud_cover
    }

    /// Keyed by hour of day.
    #[must_use]
    pub fn benchmark_rates(&self) -> &RangeTable {
        &self.benchmark_rates
    }

    #[must_use]
    pub fn elasticity_model(&self) -> &ElasticityModel {
        &self.elasticity_model
    }

    /// Shifts by timeslot, if a `<curtailment>` element was present.
    #[must_use]
    pub fn curtailment_shifts(&self) -> Option<&[f64]> {
        self.curtailment_shifts.as_deref()
    }
}
