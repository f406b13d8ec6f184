//! Form seeds loaded from YAML or JSON.
//!
//! A seed carries the starting values and, optionally, an initial snapshot
//! that differs from them plus pre-populated auxiliary trees (for example
//! to restore a half-edited draft).

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::FormError;
use crate::path::kind_name;
use crate::state::{FormState, Tree};


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub values: Value,

    /// Dirty-checking baseline; defaults to a copy of `values`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_values: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_values: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touched: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<Value>,
}


impl FormConfig {
    /// Seed with values only.
    pub fn new(values: Value) -> Self {
        FormConfig {
            values,
            ..FormConfig::default()
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, FormError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a seed file. `.yaml` and `.yml` are read as YAML, anything else
    /// as JSON.
    pub fn load(path: &Path) -> Result<Self, FormError> {
        let content = std::fs::read_to_string(path)?;
        let yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );
        debug!(path = %path.display(), yaml, "loading form seed");
        if yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Build the starting snapshot. Every supplied tree root must be a
    /// mapping, an array or `null`.
    pub fn into_state(self) -> Result<FormState, FormError> {
        check_root(Tree::Values.as_str(), &self.values)?;
        let trees = [
            ("initial_values", &self.initial_values),
            (Tree::Formatted.as_str(), &self.formatted_values),
            (Tree::Touched.as_str(), &self.touched),
            (Tree::Valid.as_str(), &self.valid),
        ];
        for (name, tree) in trees {
            if let Some(tree) = tree {
                check_root(name, tree)?;
            }
        }
        Ok(FormState::from_parts(
            self.values,
            self.initial_values,
            self.formatted_values,
            self.touched,
            self.valid,
        ))
    }
}

fn check_root(tree: &'static str, root: &Value) -> Result<(), FormError> {
    match root {
        Value::Null | Value::Object(_) | Value::Array(_) => Ok(()),
        other => Err(FormError::InvalidRoot {
            tree,
            found: kind_name(other),
        }),
    }
}
