//! Rendering a settled load into the oracle prompt.

use cs_domain::{LoadSummary, SummaryLine};

const EMPTY_LOAD: &str = "no cargo";

/// `"<qty>x <label> (<unit weight>kg)"`.
fn render_line(line: &SummaryLine) -> String {
    format!("{}x {} ({}kg)", line.quantity, line.label, line.unit_weight)
}

/// All lines joined by `", "`, or `"no cargo"` for an empty load.
pub fn summary_text(summary: &LoadSummary) -> String {
    if summary.lines.is_empty() {
        return EMPTY_LOAD.to_owned();
    }
    summary
        .lines
        .iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The natural-language request sent to the oracle.
pub fn build_prompt(summary: &LoadSummary) -> String {
    format!(
        "I drive a van with a maximum load capacity of {capacity}kg.\n\
         I am currently carrying: {items}.\n\
         The total weight is {total}kg.\n\
         The load is {pct:.1}% of capacity.\n\
         \n\
         Analyse this situation and give me safety advice for driving and \
         for stowing the cargo.\n\
         Answer in JSON format.",
        capacity = summary.capacity,
        items = summary_text(summary),
        total = summary.total_weight,
        pct = summary.percentage(),
    )
}
