//! Substructure registry for extensible capacity decoding.
//!
//! Capacity elements may contain tag-identified substructures beyond the
//! base capacity and influence factors. Each supported tag maps to a factory
//! in a [`SubstructureRegistry`]; the descriptor asks the registry for a
//! fresh instance and lets it decode its own element.

mod config;
mod core;
mod substructure;
pub mod variants;

pub use config::{builtin_registry, create_substructure_registry};
pub use core::SubstructureRegistry;
pub use substructure::{CapacityHandle, CapacitySubstructure, SubstructureFactory};
pub use variants::ThermalStorageCapacity;
