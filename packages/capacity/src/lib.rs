//! Factored capacity - decode customer capacity descriptors from XML.
//!
//! A capacity descriptor is the configuration of one kind of customer
//! capacity: its base capacity model, the factors that influence it, and any
//! number of optional substructures selected by tag.
//!
//! # Example
//!
//! ```
//! use factored_capacity::range::parse_range_table;
//!
//! let table = parse_range_table("-20~-11:1.2, -10:1.0, 0~5:0.9").unwrap();
//! assert_eq!(table.get(-15), Some(1.2));
//! assert_eq!(table.floor(-5), Some(1.0));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Tag names and defaults
//! - [`error`]: Error types and Result alias
//! - [`types`]: Closed-set attribute enums
//! - [`range`]: Range table and numeric array parsing
//! - [`xml`]: Element tree helpers
//! - [`services`]: Seed repository and model builders
//! - [`registry`]: Tag-keyed substructure factories and built-in variants
//! - [`influence`]: Influence factor decoding
//! - [`descriptor`]: Capacity descriptor decoding
//! - [`customer`]: Customer documents
//! - [`yaml`]: YAML output
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod customer;
pub mod descriptor;
pub mod error;
pub mod influence;
pub mod range;
pub mod registry;
pub mod services;
pub mod types;
pub mod xml;
pub mod yaml;

pub use customer::{load_customers, load_customers_file, CustomerSet, CustomerStructure};
pub use descriptor::{BaseCapacity, BaseCapacityType, CapacityDescriptor};
pub use error::{DecodeError, Result, UnknownTagError};
pub use influence::{InfluenceFactor, InfluenceFactors, InfluenceKind};
pub use range::{parse_range_table, RangeTable};
pub use registry::{
    builtin_registry, CapacityHandle, CapacitySubstructure, SubstructureRegistry,
    ThermalStorageCapacity,
};
pub use services::{DecodeContext, SeedRepo, ServiceContext};
pub use yaml::generate_yaml;
