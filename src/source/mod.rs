//! Upstream banner sources
//!
//! A source is a line from `sources.conf`: either a remote HTTP(S) URL or a
//! local file. Remote sources support conditional requests through the
//! validators recorded in the metadata sidecar (`meta.json`).
//!
//! # Dispatch
//!
//! | Source | Kind |
//! |--------|------|
//! | `file://...` | local, prefix stripped |
//! | `/...` | local |
//! | `~...` | local, expanded against `$HOME` |
//! | no `://` | local |
//! | anything else | remote |

mod driver;
mod fetcher;
mod kind;
mod meta;

pub use driver::FetchResult;
pub use fetcher::{FetchOutcome, Fetcher, HTTP_TIMEOUT, USER_AGENT};
pub use kind::SourceKind;
pub use meta::{MetaCache, SourceMeta};
