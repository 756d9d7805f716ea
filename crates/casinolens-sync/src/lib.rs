//! Data sources: the research API, the hosted run store, and the current-casino feed.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{DashboardClient, FetchError, ResultsMode};
