//! Layout descriptor - the renderer-agnostic output of the view layer.
//!
//! A `LayoutDescriptor` says *what* to show for one operation and *where*:
//!
//! ```text
//! LayoutDescriptor
//! ├── anchor (operationHash, for deep-linking)
//! ├── main (middle column)
//! │   ├── title { text, share_link, badges[] }
//! │   ├── endpoint? (only with pathInMiddlePanel, never for webhooks)
//! │   ├── description? { markdown?, external_docs? }
//! │   ├── extensions
//! │   ├── security
//! │   ├── tabs [Request, Response, Errors, <reserved>, <reserved>]
//! │   └── callbacks?
//! └── side (right panel)
//!     ├── endpoint? (default placement, never for webhooks)
//!     └── callback_samples?
//! ```
//!
//! Downstream renderers switch on this structure; they never see the
//! display configuration.

use crate::model::{
    CallbackNode, ExternalDocs, Extensions, OperationHash, ParameterNode, RequestBody,
    ResponseNode, SecurityRequirement,
};
use serde::{Deserialize, Serialize};

/// Labels of the fixed, ordered tabs.
pub const REQUEST_TAB: &str = "Request";
pub const RESPONSE_TAB: &str = "Response";
pub const ERRORS_TAB: &str = "Errors";

/// Number of unlabeled placeholder slots after the labeled tabs.
pub const RESERVED_TAB_SLOTS: usize = 2;

/// Complete layout for one operation section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    /// Section anchor used by the page composition layer.
    pub anchor: OperationHash,
    /// Middle column: everything read top to bottom.
    pub main: MainColumn,
    /// Right-hand panel with the endpoint and samples.
    pub side: SidePanel,
}

impl LayoutDescriptor {
    pub fn title(&self) -> &TitleArea {
        &self.main.title
    }

    pub fn tab(&self, label: &str) -> Option<&Tab> {
        self.main
            .tabs
            .iter()
            .find(|tab| tab.label.as_deref() == Some(label))
    }

    /// Content of the "Response" tab.
    pub fn success_responses(&self) -> Option<&ResponseList> {
        self.tab(RESPONSE_TAB).and_then(|tab| tab.content.responses())
    }

    /// Content of the "Errors" tab.
    pub fn error_responses(&self) -> Option<&ResponseList> {
        self.tab(ERRORS_TAB).and_then(|tab| tab.content.responses())
    }

    /// Content of the "Request" tab.
    pub fn request(&self) -> Option<&RequestSection> {
        self.tab(REQUEST_TAB).and_then(|tab| match &tab.content {
            TabContent::Request(request) => Some(request),
            _ => None,
        })
    }

    /// Where the endpoint summary ended up, if anywhere.
    pub fn endpoint_placement(&self) -> EndpointPlacement {
        match (&self.main.endpoint, &self.side.endpoint) {
            (Some(_), _) => EndpointPlacement::MainColumn,
            (None, Some(_)) => EndpointPlacement::SidePanel,
            (None, None) => EndpointPlacement::Hidden,
        }
    }
}

/// Summary of where the endpoint block is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointPlacement {
    /// Inverted variant under the title.
    MainColumn,
    SidePanel,
    /// Webhooks have no network path to show.
    Hidden,
}

/// The middle column of an operation section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainColumn {
    pub title: TitleArea,
    /// Set only when the endpoint is moved out of the side panel.
    pub endpoint: Option<EndpointSummary>,
    pub description: Option<DescriptionSection>,
    /// Handed to the extensions renderer unmodified, even when empty.
    pub extensions: Extensions,
    /// Handed to the security renderer unmodified, even when empty.
    pub security: Vec<SecurityRequirement>,
    /// Always the three labeled tabs followed by the reserved slots.
    pub tabs: Vec<Tab>,
    /// `None` when the operation declares no callbacks.
    pub callbacks: Option<CallbackList>,
}

/// The dark right-hand panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePanel {
    /// Default endpoint placement; `None` for webhooks or when moved.
    pub endpoint: Option<EndpointSummary>,
    /// `None` when the operation declares no callbacks.
    pub callback_samples: Option<CallbackSamples>,
}

/// Heading line with badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleArea {
    /// The operation summary.
    pub text: String,
    /// Target for the share-link icon next to the heading.
    pub share_link: String,
    /// Deprecated first, then Webhook.
    pub badges: Vec<Badge>,
}

impl TitleArea {
    pub fn badge_texts(&self) -> Vec<&str> {
        self.badges.iter().map(|b| b.text.as_str()).collect()
    }

    pub fn has_badge(&self, text: &str) -> bool {
        self.badges.iter().any(|b| b.text == text)
    }
}

/// Visual intent of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    Warning,
    Primary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub kind: BadgeKind,
    /// Label as shown, e.g. `Webhook | POST`.
    pub text: String,
}

impl Badge {
    pub fn new(kind: BadgeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Input for the endpoint renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSummary {
    /// Verb as declared; the endpoint renderer does its own casing.
    pub http_verb: Option<String>,
    pub path: Option<String>,
    /// Light-on-dark variant used when placed in the main column.
    pub inverted: bool,
}

/// Description block: markdown text and/or external documentation link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionSection {
    /// Present whenever the node has a description, even an empty one.
    pub markdown: Option<String>,
    pub external_docs: Option<ExternalDocs>,
}

/// One slot of the tab strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// `None` for reserved placeholder slots.
    pub label: Option<String>,
    pub content: TabContent,
}

impl Tab {
    pub fn labeled(label: &str, content: TabContent) -> Self {
        Self {
            label: Some(label.to_string()),
            content,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            label: None,
            content: TabContent::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, TabContent::Placeholder)
    }
}

/// What a tab panel holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TabContent {
    Request(RequestSection),
    /// `None` renders nothing; callers must not reserve space for it.
    Responses { list: Option<ResponseList> },
    /// Reserved slot that renders as an empty panel.
    Placeholder,
}

impl TabContent {
    pub fn responses(&self) -> Option<&ResponseList> {
        match self {
            Self::Responses { list } => list.as_ref(),
            _ => None,
        }
    }
}

/// Input for the parameters renderer, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSection {
    /// In declaration order.
    pub parameters: Vec<ParameterNode>,
    pub body: Option<RequestBody>,
}

/// Ordered, code-keyed list of responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseList {
    /// List belongs to an operation inside a callback.
    pub is_callback: bool,
    /// Input order; never empty.
    pub entries: Vec<ResponseEntry>,
}

impl ResponseList {
    pub fn codes(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    /// Rendering key; the response code.
    pub key: String,
    pub response: ResponseNode,
}

/// Callback definitions listed in the main column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackList {
    pub callbacks: Vec<CallbackEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackEntry {
    /// Callback key, e.g. `onPetAdded`.
    pub name: String,
    pub operations: Vec<CallbackOperation>,
}

/// One operation inside a callback, with its own response list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackOperation {
    /// Anchor of the nested operation.
    pub anchor: OperationHash,
    pub name: String,
    pub http_verb: Option<String>,
    pub deprecated: bool,
    /// Every response of the callback operation, unpartitioned.
    pub responses: Option<ResponseList>,
}

/// References for the callback sample renderer in the side panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackSamples {
    /// Callback nodes as declared; samples are built by the renderer.
    pub callbacks: Vec<CallbackNode>,
}
