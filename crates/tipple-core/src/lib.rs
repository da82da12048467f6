//! Deal ranking pipeline for the tipple happy-hour directory.
//!
//! Takes a caller-supplied snapshot of deals and venues, a viewer position,
//! and a civil-time instant, and produces priority-ordered, de-duplicated,
//! diversified collections ready for display. The pipeline is pure and
//! synchronous: no I/O inside a run, no shared state, and identical inputs
//! always produce identical output.
//!
//! Stages, each depending only on the ones before it:
//!
//! 1. [`schedule`] decides whether a deal is live at the evaluation instant.
//! 2. [`geo`] measures great-circle distance from the viewer to each venue.
//! 3. [`radius`] finds the smallest search tier holding a live deal.
//! 4. [`assemble`] and [`catalog`] group the survivors into named,
//!    de-duplicated collections.
//! 5. [`diversify`] breaks up back-to-back repeats of a drink or venue.
//!
//! [`pipeline::rank_collections`] wires the stages together.

pub mod assemble;
pub mod catalog;
pub mod diversify;
pub mod error;
pub mod geo;
pub mod pipeline;
pub mod radius;
pub mod schedule;
pub mod types;

pub use catalog::{load_catalog, CollectionCatalog, CollectionMeta, UnknownTagPolicy};
pub use diversify::DiversifyKey;
pub use error::{CatalogError, CoreError};
pub use geo::GeoPoint;
pub use pipeline::{rank_collections, PipelineConfig, RankedCollections};
pub use types::{Collection, Deal, EnrichedDeal, Snapshot, Venue};
