//! Operation generator - derives a `LayoutDescriptor` from an `OperationNode`.
//!
//! Creates:
//! - Title area with Deprecated/Webhook badges
//! - Endpoint summary in the main column or the side panel (never for webhooks)
//! - Description section when there is text or external docs
//! - Fixed tab strip: Request, Response (200), Errors (everything else), two reserved slots
//! - Callback definitions (main column) and callback samples (side panel)

use super::responses::{partition_responses, ResponseListView};
use super::LayoutGenerator;
use crate::config::DisplayConfig;
use crate::layout::{
    Badge, BadgeKind, CallbackEntry, CallbackList, CallbackOperation, CallbackSamples,
    DescriptionSection, EndpointSummary, LayoutDescriptor, MainColumn, RequestSection, SidePanel,
    Tab, TabContent, TitleArea, ERRORS_TAB, REQUEST_TAB, RESERVED_TAB_SLOTS, RESPONSE_TAB,
};
use crate::model::{CallbackNode, OperationNode};
use tracing::trace;

pub const DEPRECATED_BADGE: &str = "Deprecated";
pub const WEBHOOK_BADGE: &str = "Webhook";

/// Generator for a single operation section.
#[derive(Debug, Default, Clone, Copy)]
pub struct OperationGenerator {
    responses: ResponseListView,
}

impl OperationGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the layout for `operation` under `config`.
    pub fn render(&self, operation: &OperationNode, config: &DisplayConfig) -> LayoutDescriptor {
        trace!(
            operation = %operation.operation_hash,
            ?config,
            "Deriving operation layout"
        );

        let endpoint = Self::endpoint_summary(operation);
        let (main_endpoint, side_endpoint) = if operation.is_webhook {
            (None, None)
        } else if config.path_in_middle_panel {
            (
                Some(EndpointSummary {
                    inverted: true,
                    ..endpoint
                }),
                None,
            )
        } else {
            (None, Some(endpoint))
        };

        let main = MainColumn {
            title: Self::build_title(operation, config),
            endpoint: main_endpoint,
            description: Self::build_description(operation),
            extensions: operation.extensions.clone(),
            security: operation.security.clone(),
            tabs: self.build_tabs(operation),
            callbacks: self.build_callback_list(&operation.callbacks),
        };

        let side = SidePanel {
            endpoint: side_endpoint,
            callback_samples: Self::build_callback_samples(&operation.callbacks),
        };

        LayoutDescriptor {
            anchor: operation.operation_hash.clone(),
            main,
            side,
        }
    }

    /// Build the heading with its badges.
    fn build_title(operation: &OperationNode, config: &DisplayConfig) -> TitleArea {
        let mut badges = Vec::new();

        if operation.deprecated {
            badges.push(Badge::new(BadgeKind::Warning, DEPRECATED_BADGE));
        }

        if operation.is_webhook {
            let text = match (&operation.http_verb, config.show_webhook_verb) {
                (Some(verb), true) => {
                    format!("{} | {}", WEBHOOK_BADGE, verb.to_uppercase())
                }
                _ => WEBHOOK_BADGE.to_string(),
            };
            badges.push(Badge::new(BadgeKind::Primary, text));
        }

        TitleArea {
            text: operation.name.clone(),
            share_link: operation.share_id().to_string(),
            badges,
        }
    }

    fn endpoint_summary(operation: &OperationNode) -> EndpointSummary {
        EndpointSummary {
            http_verb: operation.http_verb.clone(),
            path: operation.path.clone(),
            inverted: false,
        }
    }

    /// Description block, present when there is text or external docs.
    fn build_description(operation: &OperationNode) -> Option<DescriptionSection> {
        let has_text = operation
            .description
            .as_deref()
            .is_some_and(|d| !d.is_empty());
        if !has_text && operation.external_docs.is_none() {
            return None;
        }

        Some(DescriptionSection {
            markdown: operation.description.clone(),
            external_docs: operation.external_docs.clone(),
        })
    }

    fn build_tabs(&self, operation: &OperationNode) -> Vec<Tab> {
        let partition = partition_responses(&operation.responses);

        let mut tabs = vec![
            Tab::labeled(
                REQUEST_TAB,
                TabContent::Request(RequestSection {
                    parameters: operation.parameters.clone(),
                    body: operation.request_body.clone(),
                }),
            ),
            Tab::labeled(
                RESPONSE_TAB,
                TabContent::Responses {
                    list: self.responses.render(&partition.success),
                },
            ),
            Tab::labeled(
                ERRORS_TAB,
                TabContent::Responses {
                    list: self.responses.render(&partition.other),
                },
            ),
        ];
        tabs.extend(std::iter::repeat_with(Tab::placeholder).take(RESERVED_TAB_SLOTS));
        tabs
    }

    /// Callback definitions; each callback operation lists all its responses.
    fn build_callback_list(&self, callbacks: &[CallbackNode]) -> Option<CallbackList> {
        if callbacks.is_empty() {
            return None;
        }

        let view = self.responses.for_callback(true);
        let callbacks = callbacks
            .iter()
            .map(|callback| CallbackEntry {
                name: callback.name.clone(),
                operations: callback
                    .operations
                    .iter()
                    .map(|op| CallbackOperation {
                        anchor: op.operation_hash.clone(),
                        name: op.name.clone(),
                        http_verb: op.http_verb.clone(),
                        deprecated: op.deprecated,
                        responses: view.render(&op.responses),
                    })
                    .collect(),
            })
            .collect();

        Some(CallbackList { callbacks })
    }

    fn build_callback_samples(callbacks: &[CallbackNode]) -> Option<CallbackSamples> {
        if callbacks.is_empty() {
            None
        } else {
            Some(CallbackSamples {
                callbacks: callbacks.to_vec(),
            })
        }
    }
}

impl LayoutGenerator for OperationGenerator {
    type Source = OperationNode;

    fn generate(&self, source: &OperationNode, config: &DisplayConfig) -> LayoutDescriptor {
        self.render(source, config)
    }
}
