//! XML utilities.

mod raw;
mod utils;

pub use raw::RawElement;
pub use utils::{
    element_children, element_path, find_children, find_descendant, get_tag_name,
    parse_array_attribute, parse_enum_attribute, parse_f64_attribute, parse_table_attribute,
    parse_u32_attribute_or, require_attribute, require_descendant,
};
