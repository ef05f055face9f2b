//! Built-in capacity substructures.

mod thermal;

pub use thermal::ThermalStorageCapacity;
