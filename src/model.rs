//! Document model types consumed by the view layer.
//!
//! These mirror the nodes a parsed API description produces. The view layer
//! treats them as read-only values: it reads fields, never writes them.
//!
//! Field names serialize in camelCase (`operationHash`, `isWebhook`, ...)
//! so documents produced by upstream tooling load without translation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Status code treated as the success response.
pub const SUCCESS_STATUS_CODE: &str = "200";

/// Stable identity of an operation, unique within a document.
///
/// Also used as the section anchor for deep-linking.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHash(String);

impl OperationHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for OperationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationHash({})", self.0)
    }
}

impl fmt::Display for OperationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OperationHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Link to documentation hosted outside the API description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDocs {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One security requirement set: scheme name -> required scopes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// Vendor extensions (`x-*` keys) attached to an operation.
pub type Extensions = BTreeMap<String, Value>;

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// A request parameter. Grouping and display belong to the parameter renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterNode {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// Request body, passed through to the parameter renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Media type -> schema/examples, opaque to the view layer.
    #[serde(default)]
    pub content: BTreeMap<String, Value>,
}

/// One possible response of an operation.
///
/// `code` is unique within an operation's response list; it is used as the
/// rendering key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseNode {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, Value>,
}

impl ResponseNode {
    /// Bare response with only a status code.
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: None,
            headers: BTreeMap::new(),
            content: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_STATUS_CODE
    }
}

/// A named callback: out-of-band requests the API makes back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackNode {
    pub name: String,
    #[serde(default)]
    pub operations: Vec<OperationNode>,
}

/// A documented API action: an endpoint call or a webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationNode {
    pub operation_hash: OperationHash,
    /// Share-link target; defaults to the hash when absent.
    #[serde(default)]
    pub id: String,
    /// Summary text shown as the title.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub is_webhook: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_verb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub extensions: Extensions,
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Declaration order, not sorted by code.
    #[serde(default)]
    pub responses: Vec<ResponseNode>,
    #[serde(default)]
    pub callbacks: Vec<CallbackNode>,
}

impl OperationNode {
    /// Create an operation with only identity and title set.
    pub fn new(operation_hash: impl Into<OperationHash>, name: impl Into<String>) -> Self {
        let operation_hash = operation_hash.into();
        Self {
            id: operation_hash.as_str().to_string(),
            operation_hash,
            name: name.into(),
            description: None,
            external_docs: None,
            deprecated: false,
            is_webhook: false,
            http_verb: None,
            path: None,
            extensions: Extensions::new(),
            security: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_external_docs(mut self, docs: ExternalDocs) -> Self {
        self.external_docs = Some(docs);
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn with_webhook(mut self, is_webhook: bool) -> Self {
        self.is_webhook = is_webhook;
        self
    }

    pub fn with_http_verb(mut self, verb: impl Into<String>) -> Self {
        self.http_verb = Some(verb.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterNode) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_request_body(mut self, body: RequestBody) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn with_response(mut self, response: ResponseNode) -> Self {
        self.responses.push(response);
        self
    }

    pub fn with_callback(mut self, callback: CallbackNode) -> Self {
        self.callbacks.push(callback);
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn with_security(mut self, requirement: SecurityRequirement) -> Self {
        self.security.push(requirement);
        self
    }

    /// Share-link target, falling back to the hash for documents that omit `id`.
    pub fn share_id(&self) -> &str {
        if self.id.is_empty() {
            self.operation_hash.as_str()
        } else {
            &self.id
        }
    }
}
