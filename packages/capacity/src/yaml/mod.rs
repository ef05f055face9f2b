//! YAML output for decoded customer sets.

mod writer;

pub use writer::{generate_yaml, save_yaml};
