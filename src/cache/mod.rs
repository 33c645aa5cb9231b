//! Local banner cache
//!
//! The cache directory holds three files, all owned by [`BannerCache`]:
//!
//! | File | Written by | Format |
//! |------|------------|--------|
//! | `banners.json` | `update`, `smart_update` | compact index JSON, atomic rename |
//! | `meta.json` | `update`, `smart_update` | pretty JSON validators, atomic rename |
//! | `.lock` | lock holder | holder PID, stale after 5 minutes |
//!
//! # Cache States
//!
//! | State | `is_valid` | Description |
//! |-------|------------|-------------|
//! | Absent | false | No index written yet, or cleared |
//! | Fresh | true | Decodes, younger than the TTL |
//! | Stale | false | Decodes, TTL expired |
//! | Invalid | false | Undecodable or mtime in the future |

pub mod lock;
mod manager;
pub mod store;

pub use lock::{LockGuard, LOCK_STALE_AFTER};
pub use manager::{BannerCache, CacheState, Stats};
