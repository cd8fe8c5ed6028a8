use std::borrow::Cow;

use hashlink::LinkedHashMap;
use saphyr::{Scalar, Yaml, YamlEmitter};
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::tree::{Keys, Metadata, NodeRef, Value};

/// Converts a parsed YAML node into a metadata value. Anything that is not a
/// resolved scalar or a collection becomes null.
pub fn value_from_yaml(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Value(scalar) => value_from_scalar(scalar),
        Yaml::Sequence(items) => Value::List(items.iter().map(value_from_yaml).collect()),
        Yaml::Mapping(mapping) => Value::Map(metadata_from_mapping(mapping)),
        _ => Value::Null,
    }
}

fn value_from_scalar(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Boolean(value) => Value::Bool(*value),
        Scalar::Integer(value) => Value::Integer(*value),
        Scalar::FloatingPoint(value) => Value::Float(value.into_inner()),
        Scalar::String(value) => Value::String(value.to_string()),
    }
}

/// Mapping entries with a scalar key, in document order. Entries keyed by
/// collections are skipped.
pub fn metadata_from_mapping(mapping: &LinkedHashMap<Yaml, Yaml>) -> Metadata {
    mapping
        .iter()
        .filter_map(|(key, value)| match scalar_key(key) {
            Some(key) => Some((key, value_from_yaml(value))),
            None => {
                debug!("Skipping metadata entry with a non-scalar key: {:?}", key);
                None
            }
        })
        .collect()
}

fn scalar_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::Value(Scalar::String(key)) => Some(key.to_string()),
        Yaml::Value(Scalar::Integer(key)) => Some(key.to_string()),
        Yaml::Value(Scalar::Boolean(key)) => Some(key.to_string()),
        Yaml::Value(Scalar::FloatingPoint(key)) => Some(key.into_inner().to_string()),
        _ => None,
    }
}

pub fn value_to_yaml(value: &Value) -> Yaml<'static> {
    match value {
        Value::Null => Yaml::Value(Scalar::Null),
        Value::Bool(value) => Yaml::Value(Scalar::Boolean(*value)),
        Value::Integer(value) => Yaml::Value(Scalar::Integer(*value)),
        Value::Float(value) => Yaml::Value(Scalar::FloatingPoint((*value).into())),
        Value::String(value) => Yaml::Value(Scalar::String(Cow::Owned(value.clone()))),
        Value::List(items) => Yaml::Sequence(items.iter().map(value_to_yaml).collect()),
        Value::Map(map) => Yaml::Mapping(
            map.iter()
                .map(|(key, value)| {
                    (
                        Yaml::Value(Scalar::String(Cow::Owned(key.clone()))),
                        value_to_yaml(value),
                    )
                })
                .collect(),
        ),
    }
}

pub fn to_yaml_string(value: &Value) -> Result<String, RenderError> {
    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .dump(&value_to_yaml(value))
        .context(EmitSnafu)?;
    out.push('\n');
    Ok(out)
}

/// Renders the tree below `root` with the configured key names.
pub fn tree_to_yaml_string(root: &NodeRef, keys: &Keys) -> Result<String, RenderError> {
    to_yaml_string(&root.borrow().to_value(keys))
}

#[derive(Debug, Snafu)]
pub enum RenderError {
    #[snafu(display("Failed to emit the tree as YAML"))]
    EmitError { source: saphyr::EmitError },
}
