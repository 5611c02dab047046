//! Error types for loading documents and configuration, and for validation.
//!
//! The layout derivation itself is infallible; these only cover the edges
//! where data enters the crate.

use crate::model::OperationHash;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a document model.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("failed to read document {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Extension other than `.yaml`, `.yml` or `.json`.
    #[error("unsupported document extension: {0}")]
    UnsupportedFormat(String),
}

impl DocumentError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
        }
    }
}

/// Errors raised while loading display configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config file named by the caller or `OPERATION_VIEW_CONFIG`.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config root must be a mapping")]
    NotAMapping,

    /// A known option carried a non-boolean value.
    #[error("option '{option}' must be a boolean")]
    NotABoolean {
        /// Option key as written in the file (camelCase).
        option: &'static str,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::NotAMapping => "NOT_A_MAPPING",
            Self::NotABoolean { .. } => "NOT_A_BOOLEAN",
        }
    }
}

/// Data-integrity issues in a document model.
///
/// The view layer assumes these never occur; `validate` reports them for
/// callers that want to check upstream output before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two operations share one hash.
    #[error("Duplicate operation hash '{hash}' at positions {first} and {second}")]
    DuplicateOperationHash {
        /// The shared hash.
        hash: OperationHash,
        /// Position of the first operation using it.
        first: usize,
        /// Position of the later duplicate.
        second: usize,
    },

    /// An operation has no hash, so it cannot be anchored.
    #[error("Empty operation hash at position {position} ('{name}')")]
    EmptyOperationHash {
        /// Position in declaration order.
        position: usize,
        /// Title of the offending operation, to help locate it.
        name: String,
    },

    /// Response codes are rendering keys and must be unique per operation.
    #[error("Duplicate response code '{code}' in operation '{operation}'")]
    DuplicateResponseCode {
        /// Operation (or callback operation) declaring the code twice.
        operation: OperationHash,
        /// The repeated status code.
        code: String,
    },

    /// Operation declares no responses; both response tabs render nothing.
    #[error("Operation '{operation}' declares no responses")]
    NoResponses {
        /// Operation with an empty response list.
        operation: OperationHash,
    },

    /// Webhook without a verb; the badge can never show one.
    #[error("Webhook '{operation}' has no http verb")]
    WebhookWithoutVerb {
        /// Webhook missing `httpVerb`.
        operation: OperationHash,
    },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateOperationHash { .. } => "DUPLICATE_OPERATION_HASH",
            Self::EmptyOperationHash { .. } => "EMPTY_OPERATION_HASH",
            Self::DuplicateResponseCode { .. } => "DUPLICATE_RESPONSE_CODE",
            Self::NoResponses { .. } => "NO_RESPONSES",
            Self::WebhookWithoutVerb { .. } => "WEBHOOK_WITHOUT_VERB",
        }
    }

    /// Check if this is a blocking error (vs warning).
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self,
            Self::NoResponses { .. } | Self::WebhookWithoutVerb { .. }
        )
    }
}
