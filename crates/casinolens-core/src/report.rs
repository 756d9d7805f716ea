//! Display-ready views over research results and tracked casinos.
//!
//! This is the one place raw upstream fields are resolved. Renderers only
//! ever see strings and finite numbers.

use std::str::FromStr;

use crate::coerce::{OfferText, coerce_display_string, coerce_number};
use crate::delta::BonusDelta;
use crate::model::{CurrentCasino, OfferComparison, OfferStatus, ResearchResult};

pub const NO_OFFER_DETAILS: &str = "No offer details";
pub const NO_CURRENT_OFFER: &str = "No current offer";

/// A comparison with every field resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferView {
    pub casino: String,
    pub state: String,
    pub status: OfferStatus,
    pub current_offer: String,
    pub new_offer: String,
    pub current_bonus: f64,
    pub new_bonus: f64,
    pub delta: BonusDelta,
    pub details: Option<DetailsView>,
}

/// Extra context on the discovered offer, shown only when it has a description.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    pub description: String,
    /// Present only when positive.
    pub bonus_amount: Option<f64>,
    /// Present only when positive.
    pub match_percent: Option<f64>,
}

impl OfferView {
    pub fn from_comparison(c: &OfferComparison) -> Self {
        let current_offer = match OfferText::resolve(&c.current_offer).display(NO_OFFER_DETAILS) {
            s if s.is_empty() => NO_CURRENT_OFFER.to_string(),
            s => s,
        };
        let current_bonus = coerce_number(&c.current_bonus, 0.0);
        let new_bonus = coerce_number(&c.new_bonus, 0.0);

        let details = c
            .new_details
            .as_ref()
            .filter(|d| !d.description.is_empty())
            .map(|d| DetailsView {
                description: d.description.clone(),
                bonus_amount: Some(coerce_number(&d.bonus_amount, 0.0)).filter(|v| *v > 0.0),
                match_percent: Some(coerce_number(&d.match_percent, 0.0)).filter(|v| *v > 0.0),
            });

        Self {
            casino: c.casino.clone(),
            state: c.state.clone(),
            status: c.status,
            current_offer,
            new_offer: coerce_display_string(&c.new_offer, NO_OFFER_DETAILS),
            current_bonus,
            new_bonus,
            delta: BonusDelta::between(current_bonus, new_bonus),
            details,
        }
    }
}

/// Which comparisons to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OfferStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: OfferStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => *s == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "all" => return Ok(StatusFilter::All),
            "better" => OfferStatus::Better,
            "worse" => OfferStatus::Worse,
            "same" => OfferStatus::Same,
            "alternative" => OfferStatus::Alternative,
            "new casino" | "new" => OfferStatus::NewCasino,
            other => return Err(format!("unknown status filter: {other}")),
        };
        Ok(StatusFilter::Only(status))
    }
}

/// Headline counts for a set of comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComparisonSummary {
    pub total: usize,
    pub better: usize,
    pub new_casinos: usize,
    pub alternative: usize,
}

impl ComparisonSummary {
    pub fn of(comparisons: &[OfferComparison]) -> Self {
        let count = |status| comparisons.iter().filter(|c| c.status == status).count();
        Self {
            total: comparisons.len(),
            better: count(OfferStatus::Better),
            new_casinos: count(OfferStatus::NewCasino),
            alternative: count(OfferStatus::Alternative),
        }
    }
}

/// Resolve the comparisons of `result` that pass `filter`, in upstream order.
pub fn offer_views(result: &ResearchResult, filter: StatusFilter) -> Vec<OfferView> {
    result
        .offer_comparisons
        .iter()
        .filter(|c| filter.matches(c.status))
        .map(OfferView::from_comparison)
        .collect()
}

/// `1 Casino`, `3 Casinos`.
pub fn casino_count_label(n: usize) -> String {
    if n == 1 {
        format!("{n} Casino")
    } else {
        format!("{n} Casinos")
    }
}

/// A tracked casino with its financial fields coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct CasinoCard {
    pub name: String,
    pub state: String,
    pub abbreviation: Option<String>,
    pub offer_type: Option<String>,
    pub offer_name: Option<String>,
    pub expected_deposit: f64,
    pub expected_bonus: f64,
    pub id: String,
}

impl CasinoCard {
    pub fn from_casino(c: &CurrentCasino) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            name: c.name.clone(),
            state: crate::group::state_name(c).to_string(),
            abbreviation: c.state.as_ref().and_then(|s| non_empty(&s.abbreviation)),
            offer_type: non_empty(&c.offer_type),
            offer_name: non_empty(&c.offer_name),
            expected_deposit: coerce_number(&c.expected_deposit, 0.0),
            expected_bonus: coerce_number(&c.expected_bonus, 0.0),
            id: match &c.casinodb_id {
                serde_json::Value::Null => "-".to_string(),
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }
}
