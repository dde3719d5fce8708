//! Enriched tabular layer
//!
//! Edge events joined to their endpoints' categorical metadata, addressed
//! through an explicit column model rather than formatted column names.

pub mod dimension;
pub mod enrich;

pub use dimension::{Attribute, Column, Dimension, Endpoint};
pub use enrich::{enrich, merge_topics, Attributes, EnrichedRow, EnrichedTable};
