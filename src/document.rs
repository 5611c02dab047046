//! Loaded document model.
//!
//! Holds the already-normalized operations of one API description. Building
//! this model from a raw OpenAPI/AsyncAPI file happens upstream; this type
//! only reads the normalized form from YAML or JSON.

use crate::error::DocumentError;
use crate::model::{OperationHash, OperationNode};
use crate::observe::ObservableOperation;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// All operations (endpoints and webhooks) of one API description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub operations: Vec<OperationNode>,
}

impl ApiDocument {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document, choosing the format by file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let parse: fn(&str) -> Result<Self, DocumentError> = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            other => return Err(DocumentError::UnsupportedFormat(other.to_string())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = parse(&content)?;

        info!(
            "Loaded {} operations from {}",
            document.operations.len(),
            path.display()
        );
        Ok(document)
    }

    /// Operations in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationNode> {
        self.operations.iter()
    }

    pub fn operation(&self, hash: &OperationHash) -> Option<&OperationNode> {
        self.operations.iter().find(|op| &op.operation_hash == hash)
    }

    /// Wrap one operation in an observable node for a live view.
    pub fn observe(&self, hash: &OperationHash) -> Option<ObservableOperation> {
        self.operation(hash).cloned().map(ObservableOperation::new)
    }

    pub fn webhooks(&self) -> impl Iterator<Item = &OperationNode> {
        self.operations.iter().filter(|op| op.is_webhook)
    }
}
