//! Operation Projection - deterministic layout for API operation sections.
//!
//! This crate decides *what* a documentation page shows for one API
//! operation (an endpoint or a webhook) and *where*, without drawing it:
//! - `OperationNode` - read-only document model input
//! - `DisplayConfig` - rendering preferences, passed explicitly
//! - `OperationGenerator` - pure derivation of a `LayoutDescriptor`
//! - `ResponseListView` / `partition_responses` - response grouping
//! - `ObservableOperation` / `ObservableConfig` - explicit change subscription
//! - `OperationView` - live view that recomputes on every observed change
//!
//! # Architecture
//!
//! ```text
//! ObservableOperation ─┐                     ┌─► MainColumn (title, tabs, callbacks)
//!                      ├─► OperationView ──► LayoutDescriptor
//! ObservableConfig ────┘    (generator)      └─► SidePanel (endpoint, samples)
//! ```
//!
//! Markdown, endpoint, parameter, security and sample rendering are left to
//! downstream renderers that switch on the descriptor.
//!
//! # Example
//!
//! ```
//! use operation_projection::{
//!     DisplayConfig, LayoutGenerator, OperationGenerator, OperationNode, ResponseNode,
//! };
//!
//! let operation = OperationNode::new("operation/getPet", "Get pet")
//!     .with_http_verb("get")
//!     .with_response(ResponseNode::with_code("200"))
//!     .with_response(ResponseNode::with_code("404"));
//!
//! let layout = OperationGenerator::new().generate(&operation, &DisplayConfig::default());
//! assert_eq!(layout.success_responses().unwrap().codes(), vec!["200"]);
//! assert_eq!(layout.error_responses().unwrap().codes(), vec!["404"]);
//! ```

pub mod config;
pub mod document;
mod error;
pub mod generator;
pub mod layout;
pub mod model;
pub mod observe;
pub mod validate;
pub mod view;

// Re-exports
pub use config::{DisplayConfig, DisplayConfigLoader};
pub use document::ApiDocument;
pub use error::{ConfigError, DocumentError, ValidationError};
pub use generator::{
    partition_responses, LayoutGenerator, OperationGenerator, ResponseGroup, ResponseListView,
    ResponsePartition,
};
pub use layout::{
    Badge, BadgeKind, EndpointPlacement, EndpointSummary, LayoutDescriptor, ResponseList, Tab,
    TabContent,
};
pub use model::{
    CallbackNode, ExternalDocs, OperationHash, OperationNode, ParameterLocation, ParameterNode,
    RequestBody, ResponseNode,
};
pub use observe::{
    ObservableConfig, ObservableOperation, OperationChange, OperationField, Subscription,
};
pub use validate::{validate, ValidationResult};
pub use view::OperationView;
