//! Validation for document models.
//!
//! The layout derivation assumes its inputs are sound. This pass checks
//! those assumptions ahead of rendering:
//! 1. Every operation has a non-empty hash
//! 2. Operation hashes are unique
//! 3. Response codes are unique per operation (callbacks included)
//! 4. Warnings for operations without responses and verb-less webhooks

use crate::document::ApiDocument;
use crate::error::ValidationError;
use crate::model::{OperationHash, OperationNode};
use std::collections::{HashMap, HashSet};

/// Issues found in one document, split by whether rendering may go ahead.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Issues that make the layout unreliable (duplicate keys, missing anchors).
    pub errors: Vec<ValidationError>,
    /// Issues worth reporting that still render a usable section.
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no blocking issue was recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// File `issue` under `errors` or `warnings` by its severity.
    pub fn record(&mut self, issue: ValidationError) {
        let bucket = if issue.is_blocking() {
            &mut self.errors
        } else {
            &mut self.warnings
        };
        bucket.push(issue);
    }

    /// Errors and warnings together.
    pub fn total(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}

/// Check `document` for the data-integrity issues the layout assumes away.
pub fn validate(document: &ApiDocument) -> ValidationResult {
    let mut result = ValidationResult::new();

    validate_hashes(document, &mut result);

    for operation in document.operations() {
        validate_operation(operation, &mut result);
    }

    result
}

fn validate_hashes(document: &ApiDocument, result: &mut ValidationResult) {
    let mut seen: HashMap<&OperationHash, usize> = HashMap::new();

    for (position, operation) in document.operations().enumerate() {
        if operation.operation_hash.is_empty() {
            result.record(ValidationError::EmptyOperationHash {
                position,
                name: operation.name.clone(),
            });
            continue;
        }

        if let Some(first) = seen.get(&operation.operation_hash) {
            result.record(ValidationError::DuplicateOperationHash {
                hash: operation.operation_hash.clone(),
                first: *first,
                second: position,
            });
        } else {
            seen.insert(&operation.operation_hash, position);
        }
    }
}

fn validate_operation(operation: &OperationNode, result: &mut ValidationResult) {
    validate_response_codes(operation, result);

    if operation.responses.is_empty() {
        result.record(ValidationError::NoResponses {
            operation: operation.operation_hash.clone(),
        });
    }

    if operation.is_webhook && operation.http_verb.is_none() {
        result.record(ValidationError::WebhookWithoutVerb {
            operation: operation.operation_hash.clone(),
        });
    }
}

fn validate_response_codes(operation: &OperationNode, result: &mut ValidationResult) {
    let mut codes = HashSet::new();
    let mut reported = HashSet::new();

    for response in &operation.responses {
        if !codes.insert(response.code.as_str()) && reported.insert(response.code.as_str()) {
            result.record(ValidationError::DuplicateResponseCode {
                operation: operation.operation_hash.clone(),
                code: response.code.clone(),
            });
        }
    }

    for callback in &operation.callbacks {
        for callback_operation in &callback.operations {
            validate_response_codes(callback_operation, result);
        }
    }
}
