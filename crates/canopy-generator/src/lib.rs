//! Canopy Generator Library
//!
//! Turns a content directory into a render-ready site model.
//!
//! # Modules
//!
//! - [`collector`] - Directory walk and parallel parsing
//! - [`list`] - List page aggregation
//! - [`sort`] - List ordering
//! - [`cancel`] - Cancellation of an in-flight pass
//! - [`generate`] - Generation pass orchestration

pub mod cancel;
pub mod collector;
pub mod generate;
pub mod list;
pub mod sort;

pub use cancel::CancelToken;
pub use collector::{ContentCollector, Document, DocumentError, DocumentErrorReason};
pub use generate::{GenerateError, Generator, Site};
pub use list::{ListPage, aggregate};
pub use sort::{SortConfig, SortKey, SortOrder};
