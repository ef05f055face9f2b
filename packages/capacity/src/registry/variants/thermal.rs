//! Thermal storage capacity: a heat pump charging a thermal mass that can be
//! regulated up or down within a temperature band.

use std::any::Any;

use roxmltree::Node;
use serde::Serialize;

use crate::config::THERMAL_STORAGE_TAG;
use crate::error::Result;
use crate::registry::substructure::{CapacityHandle, CapacitySubstructure};
use crate::xml::{parse_f64_attribute, require_descendant};

/// Substructure decoded from `<thermalStorageCapacity>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermalStorageCapacity {
    #[serde(skip)]
    capacity: String,

    /// Current storage temperature (deg C). Simulation state, not configuration.
    pub temperature: f64,

    /// kW(heat) per kW(elec).
    pub performance_coefficient: f64,
    /// kW
    pub max_up_regulation: f64,
    /// kW
    pub max_down_regulation: f64,
    /// kW
    pub constant_load: f64,
    /// kW/K
    pub loss_per_k: f64,
    /// kWh/K
    pub heat_capacity: f64,
    /// deg C
    pub low_temp_limit: f64,
    /// deg C
    pub high_temp_limit: f64,
    /// deg C
    pub nominal_temp: f64,
}

impl ThermalStorageCapacity {
    /// Undecoded instance owned by `capacity`.
    #[must_use]
    pub fn new(capacity: impl Into<String>) -> Self {
        Self {
            capacity: capacity.into(),
            temperature: 0.0,
            performance_coefficient: 1.0,
            max_up_regulation: 0.0,
            max_down_regulation: 0.0,
            constant_load: 0.0,
            loss_per_k: 0.0,
            heat_capacity: 0.0,
            low_temp_limit: 0.0,
            high_temp_limit: 0.0,
            nominal_temp: 0.0,
        }
    }

    /// Registry factory.
    #[must_use]
    pub fn create(owner: &CapacityHandle<'_>) -> Box<dyn CapacitySubstructure> {
        Box::new(Self::new(owner.name()))
    }

    /// Name of the owning capacity.
    #[must_use]
    pub fn capacity(&self) -> &str {
        &self.capacity
    }
}

impl CapacitySubstructure for ThermalStorageCapacity {
    fn tag(&self) -> &'static str {
        THERMAL_STORAGE_TAG
    }

    fn decode(&mut self, node: Node<'_, '_>) -> Result<()> {
        let clause = require_descendant(node, "performanceCoefficient")?;
        let performance_coefficient = parse_f64_attribute(clause, "value")?;

        let clause = require_descendant(node, "maxRegulation")?;
        let max_up_regulation = parse_f64_attribute(clause, "up")?;
        let max_down_regulation = parse_f64_attribute(clause, "down")?;

        let clause = require_descendant(node, "heatLoss")?;
        let constant_load = parse_f64_attribute(clause, "constant")?;
        let loss_per_k = parse_f64_attribute(clause, "perK")?;

        let clause = require_descendant(node, "heatCapacity")?;
        let heat_capacity = parse_f64_attribute(clause, "value")?;

        let clause = require_descendant(node, "tempRange")?;
        let low_temp_limit = parse_f64_attribute(clause, "low")?;
        let high_temp_limit = parse_f64_attribute(clause, "high")?;
        let nominal_temp = parse_f64_attribute(clause, "nominal")?;

        *self = Self {
            capacity: std::mem::take(&mut self.capacity),
            // TODO: draw the initial temperature from the band once the
            // distribution for it is settled; nominal is a placeholder.
            temperature: nominal_temp,
            performance_coefficient,
            max_up_regulation,
            max_down_regulation,
            constant_load,
            loss_per_k,
            heat_capacity,
            low_temp_limit,
            high_temp_limit,
            nominal_temp,
        };

        tracing::debug!(
            capacity = %self.capacity,
            cop = self.performance_coefficient,
            heat_capacity = self.heat_capacity,
            "Decoded thermal storage capacity"
        );
        Ok(())
    }

    fn to_yaml_value(&self) -> Result<serde_yaml_ng::Value> {
        Ok(serde_yaml_ng::to_value(self)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use roxmltree::Document;

    const FROSTY: &str = r#"<thermalStorageCapacity>
        <performanceCoefficient value="3.0"/>
        <maxRegulation up="0.0" down="500.0"/>
        <heatLoss constant="16.0" perK="0.324"/>
        <heatCapacity value="570.0"/>
        <tempRange low="-35.0" high="-15.0" nominal="-25.0"/>
    </thermalStorageCapacity>"#;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_decode_frosty_parameters() {
        let doc = Document::parse(FROSTY).unwrap();
        let mut tsc = ThermalStorageCapacity::new("frosty");
        tsc.decode(doc.root_element()).unwrap();

        assert_close(tsc.performance_coefficient, 3.0);
        assert_close(tsc.max_up_regulation, 0.0);
        assert_close(tsc.max_down_regulation, 500.0);
        assert_close(tsc.constant_load, 16.0);
        assert_close(tsc.loss_per_k, 0.324);
        assert_close(tsc.heat_capacity, 570.0);
        assert_close(tsc.low_temp_limit, -35.0);
        assert_close(tsc.high_temp_limit, -15.0);
        assert_close(tsc.nominal_temp, -25.0);
        assert_close(tsc.temperature, -25.0);
        assert_eq!(tsc.capacity(), "frosty");
    }

    #[test]
    fn test_decode_failure_leaves_instance_untouched() {
        let xml = FROSTY.replace(r#"perK="0.324""#, r#"perK="lots""#);
        let doc = Document::parse(&xml).unwrap();
        let mut tsc = ThermalStorageCapacity::new("frosty");

        let err = tsc.decode(doc.root_element()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidNumber { ref attribute, ref value, .. }
                if attribute == "perK" && value == "lots"
        ));
        assert_eq!(tsc, ThermalStorageCapacity::new("frosty"));
    }

    #[test]
    fn test_decode_missing_clause() {
        let xml = r#"<thermalStorageCapacity><performanceCoefficient value="3.0"/></thermalStorageCapacity>"#;
        let doc = Document::parse(xml).unwrap();
        let mut tsc = ThermalStorageCapacity::new("frosty");

        assert!(matches!(
            tsc.decode(doc.root_element()),
            Err(DecodeError::MissingElement { ref element, .. }) if element == "maxRegulation"
        ));
    }

    #[test]
    fn test_yaml_value_omits_owner() {
        let doc = Document::parse(FROSTY).unwrap();
        let mut tsc = ThermalStorageCapacity::new("frosty");
        tsc.decode(doc.root_element()).unwrap();

        let value = tsc.to_yaml_value().unwrap();
        assert_eq!(value["heat_capacity"].as_f64(), Some(570.0));
        assert!(value.get("capacity").is_none());
    }
}
