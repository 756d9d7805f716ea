//! Plain-text reports for research results, run history, and tracked casinos.
//!
//! Renderers write to any [`Write`] so the same code backs stdout and tests.

use std::io::{self, Write};

use casinolens_core::report::{
    CasinoCard, ComparisonSummary, OfferView, StatusFilter, casino_count_label, offer_views,
};
use casinolens_core::{
    CurrentCasino, OfferText, ResearchResult, ResearchRun, coerce_number, group_by_state,
    looks_like_encoded_payload,
};
use chrono::{DateTime, Local};
use serde_json::Value;

// ── Research results ──

/// Full report for one research result: discovery by state, then comparisons.
pub fn write_result(
    out: &mut impl Write,
    result: &ResearchResult,
    filter: StatusFilter,
) -> io::Result<()> {
    if !result.timestamp.is_empty() {
        writeln!(out, "Research run at {}", result.timestamp)?;
        writeln!(out)?;
    }
    write_missing_casinos(out, result)?;
    writeln!(out)?;
    write_comparisons(out, result, filter)
}

pub fn write_missing_casinos(out: &mut impl Write, result: &ResearchResult) -> io::Result<()> {
    writeln!(out, "=== Casino Discovery by State ===")?;
    if result.missing_casinos.is_empty() {
        writeln!(out, "  (no states researched)")?;
        return Ok(());
    }
    for (state, casinos) in &result.missing_casinos {
        writeln!(out, "{state} ({})", casino_count_label(casinos.len()))?;
        if casinos.is_empty() {
            writeln!(out, "  No casinos found")?;
            continue;
        }
        for casino in casinos {
            writeln!(out, "  - {casino}")?;
        }
    }
    Ok(())
}

pub fn write_comparisons(
    out: &mut impl Write,
    result: &ResearchResult,
    filter: StatusFilter,
) -> io::Result<()> {
    let summary = ComparisonSummary::of(&result.offer_comparisons);
    writeln!(out, "=== Offer Comparisons ===")?;
    writeln!(out, "  {:<26} {}", "Total Reviewed", summary.total)?;
    writeln!(out, "  {:<26} {}", "Better Offers", summary.better)?;
    writeln!(out, "  {:<26} {}", "New Casinos", summary.new_casinos)?;
    writeln!(out, "  {:<26} {}", "Alternative", summary.alternative)?;

    let views = offer_views(result, filter);
    if views.is_empty() {
        writeln!(out)?;
        writeln!(out, "  (no comparisons match)")?;
    }
    for view in &views {
        writeln!(out)?;
        write_offer(out, view)?;
    }
    Ok(())
}

fn write_offer(out: &mut impl Write, view: &OfferView) -> io::Result<()> {
    writeln!(
        out,
        "{} ({})  [{} {}]",
        view.casino,
        view.state,
        view.status.icon(),
        view.status
    )?;
    writeln!(
        out,
        "  {:<26} {} (${:.0})",
        "Current Offer", view.current_offer, view.current_bonus
    )?;
    match view.delta.label() {
        Some(label) => writeln!(
            out,
            "  {:<26} {} (${:.0}, {label})",
            "Discovered Offer", view.new_offer, view.new_bonus
        )?,
        None => writeln!(
            out,
            "  {:<26} {} (${:.0})",
            "Discovered Offer", view.new_offer, view.new_bonus
        )?,
    }
    if let Some(details) = &view.details {
        writeln!(out, "  {:<26} {}", "Details", details.description)?;
        if let Some(amount) = details.bonus_amount {
            writeln!(out, "  {:<26} ${amount}", "Bonus")?;
        }
        if let Some(pct) = details.match_percent {
            writeln!(out, "  {:<26} {pct}%", "Match")?;
        }
    }
    Ok(())
}

// ── Run history ──

pub fn write_runs(out: &mut impl Write, runs: &[ResearchRun]) -> io::Result<()> {
    writeln!(out, "=== Report History ===")?;
    if runs.is_empty() {
        writeln!(out, "  No reports found")?;
        return Ok(());
    }
    for run in runs {
        writeln!(
            out,
            "  #{:<6} {:<10} {:<22} {} comparisons, {} states",
            run.id,
            run.mode,
            local_time(&run.created_at),
            run.comparison_count(),
            run.state_count()
        )?;
    }
    Ok(())
}

/// Render an RFC 3339 timestamp in local time; anything else is shown verbatim.
fn local_time(ts: &str) -> String {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => ts.to_string(),
    }
}

// ── Current casinos ──

pub fn write_current_casinos(out: &mut impl Write, casinos: &[CurrentCasino]) -> io::Result<()> {
    writeln!(out, "=== Current Casinos in System ({} Total) ===", casinos.len())?;
    if casinos.is_empty() {
        writeln!(out, "  No casinos found in the system")?;
        return Ok(());
    }

    for casino in casinos {
        let card = CasinoCard::from_casino(casino);
        writeln!(out)?;
        match &card.abbreviation {
            Some(abbr) => writeln!(out, "{} ({}, {abbr})", card.name, card.state)?,
            None => writeln!(out, "{} ({})", card.name, card.state)?,
        }
        if let Some(offer_type) = &card.offer_type {
            writeln!(out, "  {:<26} {offer_type}", "Offer Type")?;
        }
        if let Some(offer_name) = &card.offer_name {
            writeln!(out, "  {:<26} {offer_name}", "Offer")?;
        }
        writeln!(out, "  {:<26} ${}", "Expected Deposit", card.expected_deposit)?;
        writeln!(out, "  {:<26} ${}", "Expected Bonus", card.expected_bonus)?;
        writeln!(out, "  {:<26} {}", "ID", card.id)?;
    }

    writeln!(out)?;
    writeln!(out, "Summary by State")?;
    for (state, group) in group_by_state(casinos).iter() {
        writeln!(out, "  {:<26} {}", state, group.len())?;
    }
    Ok(())
}

// ── Inspect ──

/// How a single raw offer field normalises.
pub fn write_inspection(out: &mut impl Write, raw: &str, fallback: &str) -> io::Result<()> {
    let encoded = looks_like_encoded_payload(raw);
    let value = Value::String(raw.to_string());
    let resolved = OfferText::resolve(&value);
    writeln!(out, "  {:<26} {}", "Looks encoded", if encoded { "yes" } else { "no" })?;
    writeln!(out, "  {:<26} {:?}", "Resolved as", resolved)?;
    writeln!(out, "  {:<26} {}", "Display", resolved.display(fallback))?;
    writeln!(out, "  {:<26} {}", "Number", coerce_number(&value, 0.0))?;
    Ok(())
}
