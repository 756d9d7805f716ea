//! Wire types produced by the research pipeline, the run store, and the
//! current-casino feed.
//!
//! The pipeline's output is not trusted to be well-formed: offer text and
//! bonus amounts stay as raw [`Value`]s and are coerced on use, and missing
//! keys default instead of failing the whole payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Upstream verdict on a discovered offer compared to the one on file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferStatus {
    Better,
    Worse,
    Same,
    Alternative,
    #[serde(rename = "New Casino")]
    NewCasino,
    /// Any tag this build does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Better => "Better",
            OfferStatus::Worse => "Worse",
            OfferStatus::Same => "Same",
            OfferStatus::Alternative => "Alternative",
            OfferStatus::NewCasino => "New Casino",
            OfferStatus::Unknown => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            OfferStatus::Better => "↑",
            OfferStatus::Worse => "↓",
            OfferStatus::Same => "=",
            OfferStatus::Alternative => "~",
            OfferStatus::NewCasino => "★",
            OfferStatus::Unknown => "?",
        }
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of the newly discovered promotion, as researched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub promotion: String,
    #[serde(default)]
    pub bonus_amount: Value,
    #[serde(default)]
    pub match_percent: Value,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

/// One current-vs-discovered offer pair for a casino in a state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferComparison {
    #[serde(default, deserialize_with = "lenient_string")]
    pub casino: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(default)]
    pub current_offer: Value,
    #[serde(default)]
    pub new_offer: Value,
    #[serde(default)]
    pub current_bonus: Value,
    #[serde(default)]
    pub new_bonus: Value,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: OfferStatus,
    #[serde(default, deserialize_with = "lenient_details")]
    pub new_details: Option<OfferDetails>,
}

/// Output of one research run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchResult {
    /// ISO 8601 timestamp string.
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    /// State name → casinos discovered there, in upstream key order.
    #[serde(default, deserialize_with = "lenient_missing_casinos")]
    pub missing_casinos: Vec<(String, Vec<String>)>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub offer_comparisons: Vec<OfferComparison>,
}

/// A stored research run row.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchRun {
    pub id: i64,
    /// `manual` or `scheduled`; other values are kept verbatim.
    #[serde(default, deserialize_with = "lenient_string")]
    pub mode: String,
    #[serde(default, deserialize_with = "lenient_result")]
    pub result_json: ResearchResult,
    /// ISO 8601 timestamp string.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

impl ResearchRun {
    pub fn comparison_count(&self) -> usize {
        self.result_json.offer_comparisons.len()
    }

    pub fn state_count(&self) -> usize {
        self.result_json.missing_casinos.len()
    }
}

/// Nested state reference on a current-casino row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateRef {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Abbreviation", default, deserialize_with = "lenient_string")]
    pub abbreviation: String,
}

/// A casino/offer row currently tracked by the backing store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentCasino {
    #[serde(default)]
    pub casinodb_id: Value,
    #[serde(rename = "Offer_Name", default, deserialize_with = "lenient_string")]
    pub offer_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub offer_type: String,
    #[serde(rename = "Expected_Deposit", default)]
    pub expected_deposit: Value,
    #[serde(rename = "Expected_Bonus", default)]
    pub expected_bonus: Value,
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub states_id: Value,
    #[serde(default, deserialize_with = "lenient_state")]
    pub state: Option<StateRef>,
}

/// Body of `GET /api/results`.
///
/// `mode=manual` answers with the fresh result, `mode=last` with the stored
/// run row wrapping it, and `null` when nothing has been stored yet.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsEnvelope {
    #[serde(default, deserialize_with = "lenient_string")]
    pub mode: String,
    #[serde(default)]
    pub result: Value,
}

impl ResultsEnvelope {
    /// Resolve the three possible `result` shapes into one [`ResearchResult`].
    pub fn into_result(self) -> Option<ResearchResult> {
        let Value::Object(mut obj) = self.result else {
            return None;
        };
        let inner = match obj.remove("result_json") {
            Some(stored) => stored,
            None => Value::Object(obj),
        };
        serde_json::from_value(inner).ok()
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
}

// ── Lenient field decoders ──
//
// Each decoder accepts any JSON value and falls back to the field's empty
// form when the shape is wrong.

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(error = %e, "dropping undecodable sequence item");
                None
            }
        })
        .collect())
}

fn lenient_status<'de, D: Deserializer<'de>>(d: D) -> Result<OfferStatus, D::Error> {
    Ok(serde_json::from_value(Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_missing_casinos<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Vec<(String, Vec<String>)>, D::Error> {
    let Value::Object(states) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(states
        .into_iter()
        .map(|(state, casinos)| {
            let names = match casinos {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            (state, names)
        })
        .collect())
}

fn lenient_details<'de, D: Deserializer<'de>>(d: D) -> Result<Option<OfferDetails>, D::Error> {
    match Value::deserialize(d)? {
        v @ Value::Object(_) => Ok(serde_json::from_value(v).ok()),
        _ => Ok(None),
    }
}

fn lenient_state<'de, D: Deserializer<'de>>(d: D) -> Result<Option<StateRef>, D::Error> {
    match Value::deserialize(d)? {
        v @ Value::Object(_) => Ok(serde_json::from_value(v).ok()),
        _ => Ok(None),
    }
}

fn lenient_result<'de, D: Deserializer<'de>>(d: D) -> Result<ResearchResult, D::Error> {
    Ok(serde_json::from_value(Value::deserialize(d)?).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comparison_from_pipeline_output() {
        let json = r#"{
            "casino": "BetMGM",
            "state": "New Jersey",
            "current_offer": "```json\n{\"promotion\": \"100% up to $1,000\"}\n```",
            "new_offer": "Bet $10, get $200",
            "current_bonus": 1000,
            "new_bonus": "200",
            "status": "New Casino",
            "new_details": {
                "casino": "BetMGM",
                "state": "New Jersey",
                "promotion": "Bet $10, get $200",
                "bonus_amount": 200,
                "match_percent": 0,
                "description": "Bonus bets on first wager"
            }
        }"#;
        let c: OfferComparison = serde_json::from_str(json).unwrap();
        assert_eq!(c.casino, "BetMGM");
        assert_eq!(c.status, OfferStatus::NewCasino);
        assert_eq!(c.new_bonus, json!("200"));
        let details = c.new_details.unwrap();
        assert_eq!(details.description, "Bonus bets on first wager");
        assert_eq!(details.bonus_amount, json!(200));
    }

    #[test]
    fn unknown_status_does_not_fail() {
        let c: OfferComparison =
            serde_json::from_value(json!({"casino": "X", "status": "Pending"})).unwrap();
        assert_eq!(c.status, OfferStatus::Unknown);
    }

    #[test]
    fn mistyped_status_keeps_the_comparison() {
        let r: ResearchResult = serde_json::from_value(json!({
            "offer_comparisons": [
                {"casino": "A", "status": "Better"},
                {"casino": "B", "status": null},
                {"casino": "C", "status": 3},
                {"casino": "D", "status": {"label": "Better"}}
            ]
        }))
        .unwrap();
        let statuses: Vec<OfferStatus> = r.offer_comparisons.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            [
                OfferStatus::Better,
                OfferStatus::Unknown,
                OfferStatus::Unknown,
                OfferStatus::Unknown
            ]
        );
        assert_eq!(r.offer_comparisons[2].casino, "C");
    }

    #[test]
    fn missing_fields_default() {
        let c: OfferComparison = serde_json::from_value(json!({})).unwrap();
        assert!(c.casino.is_empty());
        assert!(c.current_offer.is_null());
        assert!(c.new_details.is_none());
        assert_eq!(c.status, OfferStatus::Unknown);
    }

    #[test]
    fn wrong_shapes_degrade() {
        let r: ResearchResult = serde_json::from_value(json!({
            "timestamp": 12,
            "missing_casinos": {"Michigan": "oops", "Ohio": ["A", 3, "B"]},
            "offer_comparisons": [{"casino": "Ok"}, 5, {"casino": "Also ok", "new_details": "n/a"}]
        }))
        .unwrap();
        assert_eq!(r.timestamp, "12");
        assert_eq!(r.missing_casinos[0], ("Michigan".to_string(), vec![]));
        assert_eq!(r.missing_casinos[1].1, vec!["A", "B"]);
        assert_eq!(r.offer_comparisons.len(), 2);
        assert!(r.offer_comparisons[1].new_details.is_none());
    }

    #[test]
    fn missing_casinos_keep_upstream_order() {
        let r: ResearchResult = serde_json::from_str(
            r#"{"missing_casinos": {"West Virginia": [], "Michigan": ["A"], "New Jersey": ["B"]}}"#,
        )
        .unwrap();
        let states: Vec<&str> = r.missing_casinos.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(states, ["West Virginia", "Michigan", "New Jersey"]);
    }

    #[test]
    fn stored_run_row() {
        let run: ResearchRun = serde_json::from_value(json!({
            "id": 17,
            "mode": "scheduled",
            "result_json": {
                "timestamp": "2025-10-01T06:00:00",
                "missing_casinos": {"New Jersey": ["A", "B"], "Michigan": []},
                "offer_comparisons": [{"casino": "A", "status": "Better"}]
            },
            "created_at": "2025-10-01T06:00:05.123456+00:00"
        }))
        .unwrap();
        assert_eq!(run.id, 17);
        assert_eq!(run.comparison_count(), 1);
        assert_eq!(run.state_count(), 2);
    }

    #[test]
    fn run_with_broken_result_json_still_lists() {
        let run: ResearchRun =
            serde_json::from_value(json!({"id": 3, "mode": "manual", "result_json": null})).unwrap();
        assert_eq!(run.comparison_count(), 0);
        assert_eq!(run.state_count(), 0);
    }

    #[test]
    fn current_casino_row() {
        let c: CurrentCasino = serde_json::from_value(json!({
            "casinodb_id": 12,
            "Offer_Name": "Deposit $50 get $50",
            "offer_type": "Deposit Match",
            "Expected_Deposit": 50,
            "Expected_Bonus": "50",
            "Name": "Caesars",
            "states_id": 3,
            "state": {"Name": "Pennsylvania", "Abbreviation": "PA"}
        }))
        .unwrap();
        assert_eq!(c.name, "Caesars");
        assert_eq!(c.state.unwrap().abbreviation, "PA");
    }

    #[test]
    fn current_casino_null_state() {
        let c: CurrentCasino =
            serde_json::from_value(json!({"Name": "Orphan", "state": null})).unwrap();
        assert!(c.state.is_none());
    }

    #[test]
    fn envelope_with_bare_result() {
        let env: ResultsEnvelope = serde_json::from_value(json!({
            "mode": "manual",
            "result": {"timestamp": "t", "missing_casinos": {}, "offer_comparisons": []}
        }))
        .unwrap();
        assert_eq!(env.into_result().unwrap().timestamp, "t");
    }

    #[test]
    fn envelope_with_stored_run() {
        let env: ResultsEnvelope = serde_json::from_value(json!({
            "mode": "last",
            "result": {
                "id": 4,
                "mode": "manual",
                "created_at": "2025-10-01T06:00:05+00:00",
                "result_json": {"timestamp": "stored", "offer_comparisons": [{"casino": "A"}]}
            }
        }))
        .unwrap();
        let result = env.into_result().unwrap();
        assert_eq!(result.timestamp, "stored");
        assert_eq!(result.offer_comparisons.len(), 1);
    }

    #[test]
    fn envelope_with_nothing_stored() {
        let env: ResultsEnvelope =
            serde_json::from_value(json!({"mode": "last", "result": null})).unwrap();
        assert!(env.into_result().is_none());

        let env: ResultsEnvelope =
            serde_json::from_value(json!({"error": "Invalid mode. Use 'manual' or 'last'."}))
                .unwrap();
        assert!(env.into_result().is_none());
    }

    #[test]
    fn status_labels() {
        assert_eq!(OfferStatus::NewCasino.to_string(), "New Casino");
        assert_eq!(OfferStatus::Better.icon(), "↑");
        assert_eq!(
            serde_json::to_value(OfferStatus::NewCasino).unwrap(),
            json!("New Casino")
        );
    }
}
