//! Reading and writing parsed trees as JSON or YAML.
//!
//! Includes are stored inline: every included file appears as a nested tree
//! under its `include` entry.

use crate::error::InterchangeError;

use super::Thrift;

pub fn from_json(input: &str) -> Result<Thrift, InterchangeError> {
    let tree: Thrift = serde_json::from_str(input)?;
    tracing::debug!(file = %tree.filename, includes = tree.includes.len(), "loaded tree from json");
    Ok(tree)
}

pub fn from_yaml(input: &str) -> Result<Thrift, InterchangeError> {
    let tree: Thrift = serde_yaml::from_str(input)?;
    tracing::debug!(file = %tree.filename, includes = tree.includes.len(), "loaded tree from yaml");
    Ok(tree)
}

pub fn to_json(tree: &Thrift) -> Result<String, InterchangeError> {
    Ok(serde_json::to_string_pretty(tree)?)
}

pub fn to_yaml(tree: &Thrift) -> Result<String, InterchangeError> {
    Ok(serde_yaml::to_string(tree)?)
}
