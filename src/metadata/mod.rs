//! Metadata provider system for enriching discovered series with external data.
//!
//! This module defines a generic [`MetadataProvider`] trait and supporting types
//! that allow vidshelf to fetch series details and artwork from external
//! services such as TMDB.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and shared data types.
//! - [`providers`] -- Concrete provider implementations (TMDB).
//! - [`registry`] -- Provider registry for multi-source lookups.
//! - [`enrichment`] -- Resolving discovered series and fetching their artwork.

pub mod enrichment;
pub mod provider;
pub mod providers;
pub mod registry;

pub use enrichment::{EnrichedEpisode, EnrichedSeries, Enricher};
pub use provider::{EpisodeMetadata, MetadataProvider, SearchResult, SeasonSummary, SeriesMetadata};
pub use registry::{ProviderRegistry, SeriesMatch};
