//! Population statistics over the region → municipality → settlement
//! hierarchy: CSV import, an in-memory row source, grouping and five-number
//! statistics, and the report operations behind the dashboard pages.
pub mod breadcrumb;
pub mod config;
pub mod error;
pub mod facade;
pub mod loader;
pub mod output;
pub mod present;
pub mod reports;
pub mod source;
pub mod statistics;
pub mod types;
pub mod util;

pub use error::{Error, Result};
pub use facade::StatisticsFacade;
pub use source::{InMemorySource, RowSource, SettlementFilter};
