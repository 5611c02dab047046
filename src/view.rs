//! Live operation view.
//!
//! `OperationView::mount` binds the pure `OperationGenerator` to an
//! observable operation and the observable display config. The view
//! subscribes to exactly the fields the derivation reads and recomputes its
//! descriptor synchronously on every change notification. Nothing polls.
//!
//! The model holds only weak references back to the view, so dropping the
//! view releases it and detaches its subscriptions.

use crate::generator::OperationGenerator;
use crate::layout::LayoutDescriptor;
use crate::observe::{
    ListenerRegistry, ObservableConfig, ObservableOperation, OperationField, Subscription,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::debug;

/// Fields the operation derivation reads.
pub const OBSERVED_FIELDS: [OperationField; 13] = OperationField::ALL;

/// Why a recomputation happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Operation,
    Config,
}

struct ViewState {
    operation: ObservableOperation,
    config: ObservableConfig,
    generator: OperationGenerator,
    descriptor: RwLock<LayoutDescriptor>,
    recomputations: AtomicU64,
    listeners: Arc<ListenerRegistry<LayoutDescriptor>>,
}

impl ViewState {
    fn derive(&self) -> LayoutDescriptor {
        let config = self.config.get();
        self.operation
            .read(|node| self.generator.render(node, &config))
    }

    /// Re-derive and store under one write lock, so the last writer always
    /// stores the newest descriptor.
    fn refresh(&self) -> LayoutDescriptor {
        let mut slot = self
            .descriptor
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = self.derive();
        slot.clone()
    }

    fn recompute(&self, trigger: Trigger) {
        let descriptor = self.refresh();
        let count = self.recomputations.fetch_add(1, Ordering::SeqCst) + 1;

        debug!(
            operation = %descriptor.anchor,
            ?trigger,
            count,
            "Operation view recomputed"
        );
        self.listeners.emit(&descriptor);
    }
}

/// A mounted, self-updating operation section.
pub struct OperationView {
    state: Arc<ViewState>,
    _operation_subscription: Subscription,
    _config_subscription: Subscription,
}

impl OperationView {
    /// Render `operation` under `config` and keep the result current.
    pub fn mount(operation: &ObservableOperation, config: &ObservableConfig) -> Self {
        Self::mount_with(OperationGenerator::new(), operation, config)
    }

    pub fn mount_with(
        generator: OperationGenerator,
        operation: &ObservableOperation,
        config: &ObservableConfig,
    ) -> Self {
        let initial = {
            let config = config.get();
            operation.read(|node| generator.render(node, &config))
        };

        let state = Arc::new(ViewState {
            operation: operation.clone(),
            config: config.clone(),
            generator,
            descriptor: RwLock::new(initial),
            recomputations: AtomicU64::new(0),
            listeners: ListenerRegistry::new(),
        });

        let weak: Weak<ViewState> = Arc::downgrade(&state);
        let operation_subscription = operation.subscribe(&OBSERVED_FIELDS, move |_change| {
            if let Some(state) = weak.upgrade() {
                state.recompute(Trigger::Operation);
            }
        });

        let weak: Weak<ViewState> = Arc::downgrade(&state);
        let config_subscription = config.subscribe(move |_config| {
            if let Some(state) = weak.upgrade() {
                state.recompute(Trigger::Config);
            }
        });

        // Catch writes that landed between the first render and subscribing.
        state.refresh();
        debug!(operation = %operation.hash(), "Operation view mounted");

        Self {
            state,
            _operation_subscription: operation_subscription,
            _config_subscription: config_subscription,
        }
    }

    /// The current descriptor.
    pub fn descriptor(&self) -> LayoutDescriptor {
        self.state
            .descriptor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recomputations since mount. The initial render is not counted.
    pub fn recompute_count(&self) -> u64 {
        self.state.recomputations.load(Ordering::SeqCst)
    }

    /// Be told about every new descriptor.
    pub fn on_update<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&LayoutDescriptor) + Send + Sync + 'static,
    {
        self.state.listeners.add(Arc::new(callback))
    }

    pub fn operation(&self) -> &ObservableOperation {
        &self.state.operation
    }

    pub fn config(&self) -> &ObservableConfig {
        &self.state.config
    }
}

impl std::fmt::Debug for OperationView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationView")
            .field("operation", &self.state.operation.hash())
            .field("recomputations", &self.recompute_count())
            .finish()
    }
}
