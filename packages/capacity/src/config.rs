//! Configuration constants for capacity decoding.
//!
//! Tag and attribute names of the well-known capacity sections, plus the
//! limits applied while expanding compact numeric tables.

/// Tag of a single capacity element.
pub const CAPACITY_TAG: &str = "capacity";

/// Tag of the base capacity section inside a capacity.
pub const BASE_CAPACITY_TAG: &str = "baseCapacity";

/// Tag of the influence factors section inside a capacity.
pub const INFLUENCE_FACTORS_TAG: &str = "influenceFactors";

/// Tag of the thermal storage capacity substructure.
pub const THERMAL_STORAGE_TAG: &str = "thermalStorageCapacity";

/// Tag of a customer element in a customers document.
pub const CUSTOMER_TAG: &str = "customer";

/// Tag of a capacity bundle inside a customer.
pub const CAPACITY_BUNDLE_TAG: &str = "capacityBundle";

/// Default for the `count` and `bundleCount` customer attributes.
pub const DEFAULT_CUSTOMER_COUNT: u32 = 1;

/// Master seed used when the caller does not provide one.
pub const DEFAULT_MASTER_SEED: u64 = 42;

/// Maximum number of integer keys a single `low~high` range entry may expand to.
///
/// Domain keys are degrees Celsius, m/s, degrees of arc, percentages and
/// hours of day, so legitimate ranges stay far below this.
pub const MAX_RANGE_SPAN: i64 = 10_000;
