//! Recommendation Engine (C6): strategy routing, candidate gathering,
//! Trinity assembly, scoring, and fallback.

pub mod business;
pub mod candidates;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod metrics;
pub mod package_former;
pub mod scoring;
pub mod strategy;
pub mod trinity_search;
pub mod types;

pub use engine::RecommendationEngine;
pub use error::{RecommendError, RecommendResult};
pub use types::{
    Candidates, ConfidenceDistribution, GraphAlgorithm, PackageComponent, RecommendConfig, RoutingDecision,
    ScoredRecommendations, SearchStrategy, TrinityPackage,
};
