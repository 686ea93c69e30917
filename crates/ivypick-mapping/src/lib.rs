//! Picking-list statistics engine.
//!
//! Turns raw order lines from every sales platform into per-product totals
//! laid out like the production sheet.

pub mod aggregate;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod rules;
pub mod sort;
pub mod split;
mod text;

pub use aggregate::{aggregate, consolidate};
pub use error::PipelineError;
pub use normalize::{normalize, normalize_name, Normalized};
pub use pipeline::{
    apply_override, Pipeline, PipelineOptions, PipelineReport, OVERRIDE_CONFIDENCE,
};
pub use rules::map_product;
pub use sort::sort_statistics;
pub use split::{split_bundles, SplitMarker, COMBO_SPLIT_MARKER, PROMOTION_SPLIT_MARKER};
