//! Data loader (§3 loader supplement): one-shot batch ETL from the
//! three source JSON files into the knowledge graph. Wired into
//! `wr-cli load`, not a long-running service — every stage reports a
//! `LoadReport` rather than failing the whole batch on a bad record.

pub mod compatibility_loader;
pub mod error;
pub mod product_loader;
pub mod report;
pub mod sales_loader;

pub use compatibility_loader::CompatibilityLoader;
pub use error::{LoaderError, LoaderResult};
pub use product_loader::ProductLoader;
pub use report::{LoadReport, ValidationError};
pub use sales_loader::SalesLoader;
