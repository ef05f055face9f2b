//! Shared building blocks for the decoded model.

/// An enumeration decoded from an attribute with a closed set of values.
///
/// Attribute values are the upper-case names used in customer files
/// (`DIRECT`, `POPULATION`, ...). Matching is exact.
pub trait AttributeEnum: Sized + Copy + 'static {
    /// Every accepted attribute value, in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Parse an attribute value.
    fn from_attribute(value: &str) -> Option<Self>;

    /// The attribute value for this variant.
    fn as_str(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Switch {
        On,
        Off,
    }

    impl AttributeEnum for Switch {
        const VARIANTS: &'static [&'static str] = &["ON", "OFF"];

        fn from_attribute(value: &str) -> Option<Self> {
            match value {
                "ON" => Some(Self::On),
                "OFF" => Some(Self::Off),
                _ => None,
            }
        }

        fn as_str(&self) -> &'static str {
            match self {
                Self::On => "ON",
                Self::Off => "OFF",
            }
        }
    }

    #[test]
    fn test_variants_round_trip_through_as_str() {
        for value in Switch::VARIANTS {
            let parsed = Switch::from_attribute(value).unwrap();
            assert_eq!(parsed.as_str(), *value);
        }
        assert_eq!(Switch::from_attribute("on"), None);
    }
}
