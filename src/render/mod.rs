mod yaml;

pub use yaml::{
    RenderError, metadata_from_mapping, to_yaml_string, tree_to_yaml_string, value_from_yaml,
    value_to_yaml,
};
