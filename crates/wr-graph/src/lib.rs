//! Graph store adapter (C3): a Neo4j-backed client with vector-index
//! search, the generic fuzzy product search engine (C4), and the
//! one-time schema initialization run by the data loader.

pub mod client;
pub mod error;
pub mod product;
pub mod queries;
pub mod schema;

pub use client::{GraphClient, GraphConfig};
pub use error::{GraphError, GraphResult};
pub use product::{row_to_product, PRODUCT_RETURN_FIELDS};
pub use queries::algorithms::{
    category_by_sales, centrality, compatible_in_category, determines_in_category, fetch_product_by_gin,
    hybrid_search, pagerank_popular, shortest_path, vector_search, ScoredProduct,
};
pub use queries::search::{search_products, ProductSearchResult};
pub use queries::trinity::{
    co_ordered_with_trinity, golden_package_gins, most_compatible_by_sales, search_trinities_by_embedding,
    trinities_by_power_source_name, trinity_accessories, trinity_members, ScoredTrinity, TrinityMembers,
};
pub use schema::initialize_schema;
