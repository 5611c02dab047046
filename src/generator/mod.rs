//! Layout generators that turn document nodes into layout descriptors.
//!
//! ## Architecture
//!
//! ```text
//! OperationNode ──► OperationGenerator ──► LayoutDescriptor
//!                        │
//!                        └── responses ──► partition ──► ResponseListView (x2)
//! ```
//!
//! Generators are deterministic: same input and config produce the same
//! output.

pub mod operation;
pub mod responses;

pub use operation::OperationGenerator;
pub use responses::{partition_responses, ResponseGroup, ResponseListView, ResponsePartition};

use crate::config::DisplayConfig;
use crate::layout::LayoutDescriptor;

/// Trait for types that can derive a layout descriptor.
///
/// Implementations must be pure: they read `source` and `config` and
/// mutate neither.
pub trait LayoutGenerator {
    /// The node type this generator reads.
    type Source;

    /// Derive the layout for `source` under `config`.
    fn generate(&self, source: &Self::Source, config: &DisplayConfig) -> LayoutDescriptor;

    /// Derive the layout with default display options.
    fn generate_with_defaults(&self, source: &Self::Source) -> LayoutDescriptor {
        self.generate(source, &DisplayConfig::default())
    }
}
