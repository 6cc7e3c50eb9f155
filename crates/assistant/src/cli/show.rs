//! `cargasegura show`: one-shot print of the saved load.

use cs_load::LoadSnapshot;

use super::render::{render_totals, render_types};

pub fn show(snapshot: &LoadSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(snapshot))?);
    } else {
        println!("{}", render_types(snapshot));
        println!();
        println!("{}", render_totals(snapshot));
    }
    Ok(())
}

pub fn to_json(snapshot: &LoadSnapshot) -> serde_json::Value {
    serde_json::json!({
        "types": snapshot.types,
        "quantities": snapshot.quantities,
        "capacity_kg": snapshot.capacity,
        "total_kg": snapshot.total_weight,
        "percentage": snapshot.percentage(),
        "remaining_kg": snapshot.remaining(),
    })
}
