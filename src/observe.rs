//! Observable document nodes and display configuration.
//!
//! The view layer does not poll. A node exposes its current value
//! (`get_field`, `snapshot`) and a subscription (`subscribe`); every write
//! that actually changes a value notifies the subscribers interested in
//! the changed fields, synchronously, once per write.
//!
//! ```text
//! set_deprecated(true) ──► write lock ──► compare ──► assign ──► unlock
//!                                                                  │
//!                          notify(OperationChange { [deprecated] }) ◄┘
//!                                   │
//!                    ┌──────────────┼──────────────┐
//!                    ▼              ▼              ▼
//!               OperationView   OperationView   other subscriber
//! ```
//!
//! Callbacks never run while a lock is held, so a callback may read the
//! node it was notified about.

use crate::config::DisplayConfig;
use crate::model::{
    CallbackNode, ExternalDocs, Extensions, OperationHash, OperationNode, ParameterNode,
    RequestBody, ResponseNode, SecurityRequirement,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use tracing::{debug, trace, warn};

/// A field of an operation node the view layer can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationField {
    Name,
    Description,
    ExternalDocs,
    Deprecated,
    IsWebhook,
    HttpVerb,
    Path,
    Extensions,
    Security,
    Parameters,
    RequestBody,
    Responses,
    Callbacks,
}

impl OperationField {
    /// Every observable field, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Name,
        Self::Description,
        Self::ExternalDocs,
        Self::Deprecated,
        Self::IsWebhook,
        Self::HttpVerb,
        Self::Path,
        Self::Extensions,
        Self::Security,
        Self::Parameters,
        Self::RequestBody,
        Self::Responses,
        Self::Callbacks,
    ];

    /// Document-model name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::ExternalDocs => "externalDocs",
            Self::Deprecated => "deprecated",
            Self::IsWebhook => "isWebhook",
            Self::HttpVerb => "httpVerb",
            Self::Path => "path",
            Self::Extensions => "extensions",
            Self::Security => "security",
            Self::Parameters => "parameters",
            Self::RequestBody => "requestBody",
            Self::Responses => "responses",
            Self::Callbacks => "callbacks",
        }
    }

    /// Look a field up by its document-model name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for OperationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields touched by one write. Usually a single field.
pub type FieldSet = SmallVec<[OperationField; 4]>;

/// Notification sent to operation subscribers.
///
/// Serializes as `{"operation": "...", "fields": ["deprecated", ...]}` for
/// consumers that forward changes over a wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationChange {
    pub operation: OperationHash,
    pub fields: FieldSet,
}

impl OperationChange {
    /// True if any changed field is in `fields`.
    pub fn touches(&self, fields: &[OperationField]) -> bool {
        self.fields.iter().any(|f| fields.contains(f))
    }
}

// ============================================================================
// LISTENER REGISTRY
// ============================================================================

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Something a `Subscription` can detach itself from.
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

/// Ordered list of callbacks for one event type.
pub(crate) struct ListenerRegistry<E> {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(u64, Callback<E>)>>,
}

impl<E: 'static> ListenerRegistry<E> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
        })
    }

    pub(crate) fn add(self: &Arc<Self>, callback: Callback<E>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        write_lock(&self.listeners).push((id, callback));
        let registry: Weak<dyn Detach> = Arc::downgrade(self) as Weak<dyn Detach>;
        Subscription { registry, id }
    }

    /// Call every listener registered at the time of the call.
    pub(crate) fn emit(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = read_lock(&self.listeners)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        read_lock(&self.listeners).len()
    }
}

impl<E: 'static> Detach for ListenerRegistry<E> {
    fn detach(&self, id: u64) {
        write_lock(&self.listeners).retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Handle for an active subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<dyn Detach>,
    id: u64,
}

impl Subscription {
    /// Unsubscribe now. Same as dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
            trace!(id = self.id, "Subscription detached");
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subscription({})", self.id)
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// OBSERVABLE OPERATION
// ============================================================================

struct OperationCell {
    node: RwLock<OperationNode>,
    listeners: Arc<ListenerRegistry<OperationChange>>,
}

/// An operation node owned by the document model, observable by views.
///
/// Cloning yields another handle to the same node.
#[derive(Clone)]
pub struct ObservableOperation {
    inner: Arc<OperationCell>,
}

impl ObservableOperation {
    pub fn new(node: OperationNode) -> Self {
        Self {
            inner: Arc::new(OperationCell {
                node: RwLock::new(node),
                listeners: ListenerRegistry::new(),
            }),
        }
    }

    pub fn hash(&self) -> OperationHash {
        read_lock(&self.inner.node).operation_hash.clone()
    }

    /// Clone of the current node.
    pub fn snapshot(&self) -> OperationNode {
        read_lock(&self.inner.node).clone()
    }

    /// Run `f` against the current node without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&OperationNode) -> R) -> R {
        f(&read_lock(&self.inner.node))
    }

    /// Current value of one field as JSON. Absent optional fields are `null`.
    pub fn get_field(&self, field: OperationField) -> Value {
        let node = read_lock(&self.inner.node);
        let value = match field {
            OperationField::Name => serde_json::to_value(&node.name),
            OperationField::Description => serde_json::to_value(&node.description),
            OperationField::ExternalDocs => serde_json::to_value(&node.external_docs),
            OperationField::Deprecated => serde_json::to_value(node.deprecated),
            OperationField::IsWebhook => serde_json::to_value(node.is_webhook),
            OperationField::HttpVerb => serde_json::to_value(&node.http_verb),
            OperationField::Path => serde_json::to_value(&node.path),
            OperationField::Extensions => serde_json::to_value(&node.extensions),
            OperationField::Security => serde_json::to_value(&node.security),
            OperationField::Parameters => serde_json::to_value(&node.parameters),
            OperationField::RequestBody => serde_json::to_value(&node.request_body),
            OperationField::Responses => serde_json::to_value(&node.responses),
            OperationField::Callbacks => serde_json::to_value(&node.callbacks),
        };
        value.unwrap_or(Value::Null)
    }

    /// Subscribe to changes of any of `fields`.
    ///
    /// The callback runs synchronously after each write that changes at
    /// least one of them, once per write.
    pub fn subscribe<F>(&self, fields: &[OperationField], callback: F) -> Subscription
    where
        F: Fn(&OperationChange) + Send + Sync + 'static,
    {
        let watched: FieldSet = fields.iter().copied().collect();
        debug!(
            operation = %self.hash(),
            fields = ?watched,
            "Subscribing to operation"
        );
        self.inner.listeners.add(Arc::new(move |change: &OperationChange| {
            if change.touches(&watched) {
                callback(change);
            }
        }))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Apply an arbitrary edit and notify once with every field it changed.
    ///
    /// Identity (`operationHash`, `id`) is fixed for the node's lifetime;
    /// edits to it are reverted.
    pub fn update(&self, edit: impl FnOnce(&mut OperationNode)) -> FieldSet {
        let (hash, changed) = {
            let mut node = write_lock(&self.inner.node);
            let before = node.clone();
            edit(&mut node);

            if node.operation_hash != before.operation_hash || node.id != before.id {
                warn!(
                    operation = %before.operation_hash,
                    "Ignoring edit to operation identity"
                );
                node.operation_hash = before.operation_hash.clone();
                node.id = before.id.clone();
            }

            (node.operation_hash.clone(), changed_fields(&before, &node))
        };

        if !changed.is_empty() {
            self.notify(hash, changed.clone());
        }
        changed
    }

    pub fn set_name(&self, name: impl Into<String>) -> bool {
        self.set(OperationField::Name, name.into(), |n| &mut n.name)
    }

    pub fn set_description(&self, description: Option<String>) -> bool {
        self.set(OperationField::Description, description, |n| {
            &mut n.description
        })
    }

    pub fn set_external_docs(&self, docs: Option<ExternalDocs>) -> bool {
        self.set(OperationField::ExternalDocs, docs, |n| &mut n.external_docs)
    }

    pub fn set_deprecated(&self, deprecated: bool) -> bool {
        self.set(OperationField::Deprecated, deprecated, |n| &mut n.deprecated)
    }

    pub fn set_webhook(&self, is_webhook: bool) -> bool {
        self.set(OperationField::IsWebhook, is_webhook, |n| &mut n.is_webhook)
    }

    pub fn set_http_verb(&self, verb: Option<String>) -> bool {
        self.set(OperationField::HttpVerb, verb, |n| &mut n.http_verb)
    }

    pub fn set_path(&self, path: Option<String>) -> bool {
        self.set(OperationField::Path, path, |n| &mut n.path)
    }

    pub fn set_extensions(&self, extensions: Extensions) -> bool {
        self.set(OperationField::Extensions, extensions, |n| {
            &mut n.extensions
        })
    }

    pub fn set_security(&self, security: Vec<SecurityRequirement>) -> bool {
        self.set(OperationField::Security, security, |n| &mut n.security)
    }

    pub fn set_parameters(&self, parameters: Vec<ParameterNode>) -> bool {
        self.set(OperationField::Parameters, parameters, |n| {
            &mut n.parameters
        })
    }

    pub fn set_request_body(&self, body: Option<RequestBody>) -> bool {
        self.set(OperationField::RequestBody, body, |n| &mut n.request_body)
    }

    pub fn set_responses(&self, responses: Vec<ResponseNode>) -> bool {
        self.set(OperationField::Responses, responses, |n| &mut n.responses)
    }

    pub fn set_callbacks(&self, callbacks: Vec<CallbackNode>) -> bool {
        self.set(OperationField::Callbacks, callbacks, |n| &mut n.callbacks)
    }

    /// Assign one field; notify only if the value changed.
    fn set<T: PartialEq>(
        &self,
        field: OperationField,
        value: T,
        slot: impl FnOnce(&mut OperationNode) -> &mut T,
    ) -> bool {
        let hash = {
            let mut node = write_lock(&self.inner.node);
            let target = slot(&mut node);
            if *target == value {
                return false;
            }
            *target = value;
            node.operation_hash.clone()
        };

        self.notify(hash, smallvec::smallvec![field]);
        true
    }

    fn notify(&self, operation: OperationHash, fields: FieldSet) {
        debug!(%operation, ?fields, "Operation changed");
        self.inner
            .listeners
            .emit(&OperationChange { operation, fields });
    }
}

impl fmt::Debug for ObservableOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableOperation")
            .field("operation", &self.hash())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn changed_fields(before: &OperationNode, after: &OperationNode) -> FieldSet {
    OperationField::ALL
        .into_iter()
        .filter(|field| match field {
            OperationField::Name => before.name != after.name,
            OperationField::Description => before.description != after.description,
            OperationField::ExternalDocs => before.external_docs != after.external_docs,
            OperationField::Deprecated => before.deprecated != after.deprecated,
            OperationField::IsWebhook => before.is_webhook != after.is_webhook,
            OperationField::HttpVerb => before.http_verb != after.http_verb,
            OperationField::Path => before.path != after.path,
            OperationField::Extensions => before.extensions != after.extensions,
            OperationField::Security => before.security != after.security,
            OperationField::Parameters => before.parameters != after.parameters,
            OperationField::RequestBody => before.request_body != after.request_body,
            OperationField::Responses => before.responses != after.responses,
            OperationField::Callbacks => before.callbacks != after.callbacks,
        })
        .collect()
}

// ============================================================================
// OBSERVABLE CONFIG
// ============================================================================

struct ConfigCell {
    config: RwLock<DisplayConfig>,
    listeners: Arc<ListenerRegistry<DisplayConfig>>,
}

/// Process-wide display configuration.
///
/// Written by a settings collaborator, read by views. Views never write it.
#[derive(Clone)]
pub struct ObservableConfig {
    inner: Arc<ConfigCell>,
}

impl Default for ObservableConfig {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}

impl ObservableConfig {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            inner: Arc::new(ConfigCell {
                config: RwLock::new(config),
                listeners: ListenerRegistry::new(),
            }),
        }
    }

    pub fn get(&self) -> DisplayConfig {
        *read_lock(&self.inner.config)
    }

    /// Replace the configuration; notifies only if it changed.
    pub fn set(&self, config: DisplayConfig) -> bool {
        self.update(|current| *current = config)
    }

    pub fn update(&self, edit: impl FnOnce(&mut DisplayConfig)) -> bool {
        let updated = {
            let mut current = write_lock(&self.inner.config);
            let before = *current;
            edit(&mut current);
            if *current == before {
                return false;
            }
            *current
        };

        debug!(config = ?updated, "Display config changed");
        self.inner.listeners.emit(&updated);
        true
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&DisplayConfig) + Send + Sync + 'static,
    {
        self.inner.listeners.add(Arc::new(callback))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl fmt::Debug for ObservableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableConfig")
            .field("config", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<OperationChange>>>, impl Fn(&OperationChange) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |change: &OperationChange| {
            sink.lock().unwrap().push(change.clone())
        })
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in OperationField::ALL {
            assert_eq!(OperationField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(OperationField::from_name("operationHash"), None);
    }

    #[test]
    fn test_get_field() {
        let op = ObservableOperation::new(
            OperationNode::new("op", "Get pet").with_http_verb("get"),
        );
        assert_eq!(op.get_field(OperationField::Name), serde_json::json!("Get pet"));
        assert_eq!(op.get_field(OperationField::HttpVerb), serde_json::json!("get"));
        assert_eq!(op.get_field(OperationField::Description), Value::Null);
        assert_eq!(op.get_field(OperationField::Deprecated), serde_json::json!(false));
        assert_eq!(op.get_field(OperationField::Responses), serde_json::json!([]));
    }

    #[test]
    fn test_setter_notifies_once() {
        let op = ObservableOperation::new(OperationNode::new("op", "Get pet"));
        let (seen, callback) = recorder();
        let _sub = op.subscribe(&[OperationField::Deprecated], callback);

        assert!(op.set_deprecated(true));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].operation.as_str(), "op");
        assert_eq!(seen[0].fields.as_slice(), &[OperationField::Deprecated]);
    }

    #[test]
    fn test_change_serializes_field_names() {
        let op = ObservableOperation::new(OperationNode::new("op", "Get pet"));
        let (seen, callback) = recorder();
        let _sub = op.subscribe(&OperationField::ALL, callback);

        op.update(|node| {
            node.is_webhook = true;
            node.http_verb = Some("post".to_string());
        });

        let seen = seen.lock().unwrap();
        assert_eq!(
            serde_json::to_value(&seen[0]).unwrap(),
            serde_json::json!({"operation": "op", "fields": ["isWebhook", "httpVerb"]})
        );
    }

    #[test]
    fn test_unchanged_value_does_not_notify() {
        let op = ObservableOperation::new(OperationNode::new("op", "Get pet"));
        let (seen, callback) = recorder();
        let _sub = op.subscribe(&OperationField::ALL, callback);

        assert!(!op.set_name("Get pet"));
        assert!(!op.set_deprecated(false));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unwatched_field_does_not_notify() {
        let op = ObservableOperation::new(OperationNode::new("op", "Get pet"));
        let (seen, callback) = recorder();
        let _sub = op.subscribe(&[OperationField::Name], callback);

        op.set_path(Some("/pets".to_string()));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_update_batches_fields() {
        let op = ObservableOperation::new(OperationNode::new("op", "Get pet"));
        let (seen, callback) = recorder();
        let _sub = op.subscribe(&OperationField::ALL, callback);

        let changed = op.update(|node| {
            node.deprecated = true;
            node.responses.push(ResponseNode::with_code("200"));
        });

        assert_eq!(
            changed.as_slice(),
            &[OperationField::Deprecated, OperationField::Responses]
        );
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_update_reverts_identity_edits() {
        let op = ObservableOperation::new(OperationNode::new("op", "Get pet"));
        let changed = op.update(|node| {
            node.operation_hash = OperationHash::new("other");
        });
        assert!(changed.is_empty());
        assert_eq!(op.hash().as_str(), "op");
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let op = ObservableOperation::new(OperationNode::new("op", "Get pet"));
        let (seen, callback) = recorder();
        let sub = op.subscribe(&OperationField::ALL, callback);
        assert_eq!(op.subscriber_count(), 1);

        drop(sub);
        assert_eq!(op.subscriber_count(), 0);
        op.set_deprecated(true);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_callback_can_read_node() {
        let op = ObservableOperation::new(OperationNode::new("op", "Get pet"));
        let reader = op.clone();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let _sub = op.subscribe(&[OperationField::Name], move |_| {
            *sink.lock().unwrap() = Some(reader.read(|n| n.name.clone()));
        });

        op.set_name("Find pet");
        assert_eq!(seen.lock().unwrap().as_deref(), Some("Find pet"));
    }

    #[test]
    fn test_config_notifies_on_change_only() {
        let config = ObservableConfig::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = config.subscribe(move |c| sink.lock().unwrap().push(*c));

        assert!(!config.set(DisplayConfig::default()));
        assert!(config.update(|c| c.show_webhook_verb = true));
        assert!(!config.update(|c| c.show_webhook_verb = true));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].show_webhook_verb);
        assert!(config.get().show_webhook_verb);
    }
}
