//! Plain-text rendering of the load and the advisory.

use std::fmt::Write;

use cs_load::{LoadLevel, LoadSnapshot};

use crate::runtime::{AdvisorPhase, AdvisorView};

/// One row per container type, built-ins first.
pub fn render_types(snapshot: &LoadSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<22} {:<20} {:>9} {:>5} {:>10}", "ID", "NAME", "UNIT KG", "QTY", "KG");
    for t in &snapshot.types {
        let qty = snapshot.quantities.get(&t.id).copied().unwrap_or(0);
        let name = if t.custom {
            format!("{} *", t.name)
        } else {
            t.name.clone()
        };
        let _ = writeln!(
            out,
            "{:<22} {:<20} {:>9} {:>5} {:>10}",
            t.id,
            name,
            t.weight,
            qty,
            f64::from(qty) * t.weight
        );
    }
    out.push_str("(* custom type)");
    out
}

/// `Total: 150 kg of 1000 kg (15.0%), 850 kg remaining`, flagged when high
/// or over capacity.
pub fn render_totals(snapshot: &LoadSnapshot) -> String {
    let mut line = format!(
        "Total: {} kg of {} kg ({:.1}%), {} kg remaining",
        snapshot.total_weight,
        snapshot.capacity,
        snapshot.percentage(),
        snapshot.remaining()
    );
    match snapshot.level() {
        LoadLevel::Normal => {}
        LoadLevel::High => line.push_str("  [HIGH]"),
        LoadLevel::Over => line.push_str("  [OVER CAPACITY]"),
    }
    line
}

pub fn render_advice(view: &AdvisorView) -> String {
    let Some(advice) = view.advice.as_ref() else {
        return match view.phase {
            AdvisorPhase::Idle => "Advice: add cargo to get safety advice.".to_owned(),
            _ => "Advice: analysing…".to_owned(),
        };
    };

    let mut out = format!(
        "Advice [{}]: {}",
        advice.status.as_str().to_uppercase(),
        advice.message
    );
    match view.phase {
        AdvisorPhase::Failed => out.push_str(" (local judgment)"),
        p if p.is_pending() => out.push_str(" (updating…)"),
        _ => {}
    }
    for tip in &advice.tips {
        let _ = write!(out, "\n  - {tip}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_domain::{AdvisoryResult, AdvisoryStatus};
    use cs_load::{Catalog, LoadState, QuantityMap};

    fn snapshot(large: i64, capacity: u64) -> LoadSnapshot {
        let mut state = LoadState::new(Catalog::new(), QuantityMap::new(), capacity);
        state.set_quantity("box-1", large);
        state.snapshot()
    }

    fn view(phase: AdvisorPhase, advice: Option<AdvisoryResult>) -> AdvisorView {
        AdvisorView {
            phase,
            advice,
            generation: 1,
            revision: 1,
        }
    }

    #[test]
    fn totals_show_percentage_with_one_decimal() {
        assert_eq!(
            render_totals(&snapshot(10, 1000)),
            "Total: 150 kg of 1000 kg (15.0%), 850 kg remaining"
        );
    }

    #[test]
    fn totals_flag_high_and_over() {
        assert!(render_totals(&snapshot(6, 100)).ends_with("[HIGH]"));
        assert!(render_totals(&snapshot(7, 100)).ends_with("[OVER CAPACITY]"));
    }

    #[test]
    fn types_table_lists_every_type() {
        let table = render_types(&snapshot(2, 1000));
        assert!(table.contains("box-1"));
        assert!(table.contains("Medium box"));
        assert!(table.lines().any(|l| l.starts_with("box-1") && l.ends_with("30")));
    }

    #[test]
    fn advice_placeholders() {
        assert!(render_advice(&view(AdvisorPhase::Idle, None)).contains("add cargo"));
        assert!(render_advice(&view(AdvisorPhase::Settling, None)).contains("analysing"));
        assert!(render_advice(&view(AdvisorPhase::Requesting, None)).contains("analysing"));
    }

    #[test]
    fn fallback_advice_is_marked_local() {
        let text = render_advice(&view(
            AdvisorPhase::Failed,
            Some(AdvisoryResult::fallback(600.0, 500)),
        ));
        assert!(text.starts_with("Advice [DANGER]"));
        assert!(text.contains("(local judgment)"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn stale_advice_is_marked_updating() {
        let advice = AdvisoryResult {
            status: AdvisoryStatus::Safe,
            message: "Fine".into(),
            tips: vec![],
        };
        assert_eq!(
            render_advice(&view(AdvisorPhase::Settling, Some(advice))),
            "Advice [SAFE]: Fine (updating…)"
        );
    }
}
