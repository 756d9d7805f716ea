pub mod coerce;
pub mod config;
pub mod delta;
pub mod extract;
pub mod group;
pub mod model;
pub mod report;

pub use coerce::{OfferText, coerce_display_string, coerce_number};
pub use config::{DashboardConfig, StoreConfig};
pub use delta::BonusDelta;
pub use extract::{extract_json, extract_value, looks_like_encoded_payload};
pub use group::{StateGroups, group_by_state};
pub use model::{
    CurrentCasino, HealthStatus, OfferComparison, OfferDetails, OfferStatus, ResearchResult,
    ResearchRun, ResultsEnvelope, StateRef,
};
