//! basar - Volatility3 ISF symbol cache manager
//!
//! Fetches ISF banner indexes from several upstream sources in parallel,
//! merges them, and keeps the result in a local cache that volatility3
//! reads through `remote_isf_url`.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod integrations;
pub mod source;
pub mod ui;

pub use cache::{BannerCache, CacheState, Stats};
pub use config::Config;
pub use error::{BasarError, BasarResult};
pub use index::{merge, BannerIndex};
