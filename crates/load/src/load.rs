//! Load State Manager: quantities per container type and the capacity
//! limit, plus the totals derived from them.

use std::collections::BTreeMap;

use cs_domain::{ContainerType, InputError, LoadSummary, SummaryLine};

use crate::catalog::Catalog;

/// Container type id → count. Absent keys mean zero; zero counts are never
/// stored, so the map is canonical.
pub type QuantityMap = BTreeMap<String, u32>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Derived read-outs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Σ quantity × unit weight over the given types.
pub fn total_weight<'a>(
    types: impl IntoIterator<Item = &'a ContainerType>,
    quantities: &QuantityMap,
) -> f64 {
    types
        .into_iter()
        .map(|t| f64::from(quantities.get(&t.id).copied().unwrap_or(0)) * t.weight)
        .sum()
}

/// Load as a percentage of capacity.
pub fn percentage(total: f64, capacity: u64) -> f64 {
    total / capacity.max(1) as f64 * 100.0
}

/// Capacity still available, never negative.
pub fn remaining(total: f64, capacity: u64) -> f64 {
    (capacity as f64 - total).max(0.0)
}

/// Coarse fill level used to colour the read-outs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadLevel {
    Normal,
    /// Above 80 % of capacity.
    High,
    /// Above capacity.
    Over,
}

impl LoadLevel {
    pub fn classify(total: f64, capacity: u64) -> Self {
        let capacity = capacity.max(1) as f64;
        if total > capacity {
            LoadLevel::Over
        } else if total / capacity > 0.8 {
            LoadLevel::High
        } else {
            LoadLevel::Normal
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Input coercion
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Integer-field parsing: optional sign and leading digits, anything else
/// yields 0 (`"12.7"` → 12, `"abc"` → 0). Saturates instead of overflowing.
pub fn parse_integer(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative {
        -value
    } else {
        value
    }
}

/// Clamp a requested count to the non-negative `u32` range.
pub fn clamp_quantity(qty: i64) -> u32 {
    qty.clamp(0, i64::from(u32::MAX)) as u32
}

/// Clamp a requested capacity to at least 1 kg.
pub fn clamp_capacity(value: i64) -> u64 {
    value.max(1) as u64
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Snapshot
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The observable load tuple: container set, quantities, capacity and the
/// total derived from them. Two snapshots compare equal exactly when none
/// of those inputs changed; `revision` is not part of the comparison.
#[derive(Debug, Clone)]
pub struct LoadSnapshot {
    pub types: Vec<ContainerType>,
    pub quantities: QuantityMap,
    pub capacity: u64,
    pub total_weight: f64,
    /// Publication counter of the session that produced this snapshot.
    /// Zero for snapshots taken straight from a [`LoadState`].
    pub revision: u64,
}

impl PartialEq for LoadSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
            && self.quantities == other.quantities
            && self.capacity == other.capacity
            && self.total_weight == other.total_weight
    }
}

impl LoadSnapshot {
    pub fn percentage(&self) -> f64 {
        percentage(self.total_weight, self.capacity)
    }

    pub fn remaining(&self) -> f64 {
        remaining(self.total_weight, self.capacity)
    }

    pub fn level(&self) -> LoadLevel {
        LoadLevel::classify(self.total_weight, self.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.total_weight <= 0.0
    }

    /// Summary lines for every type with a positive quantity, in catalog order.
    pub fn summary(&self) -> LoadSummary {
        let lines = self
            .types
            .iter()
            .filter_map(|t| {
                let quantity = self.quantities.get(&t.id).copied().unwrap_or(0);
                (quantity > 0).then(|| SummaryLine {
                    label: t.name.clone(),
                    quantity,
                    unit_weight: t.weight,
                })
            })
            .collect();
        LoadSummary {
            lines,
            total_weight: self.total_weight,
            capacity: self.capacity,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Load state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Quantities and capacity for one session.
///
/// All setters are total over malformed input: they clamp or ignore, and
/// report whether anything changed. Persistence is the caller's concern.
#[derive(Debug, Clone)]
pub struct LoadState {
    catalog: Catalog,
    quantities: QuantityMap,
    capacity: u64,
}

impl LoadState {
    /// Assemble state from loaded parts, dropping zero counts and entries
    /// for types the catalog does not know.
    pub fn new(catalog: Catalog, quantities: QuantityMap, capacity: u64) -> Self {
        let before = quantities.len();
        let quantities: QuantityMap = quantities
            .into_iter()
            .filter(|(id, qty)| *qty > 0 && catalog.contains(id))
            .collect();
        if quantities.len() != before {
            tracing::warn!(
                dropped = before - quantities.len(),
                "discarded orphaned or zero quantity entries"
            );
        }

        Self {
            catalog,
            quantities,
            capacity: capacity.max(1),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn quantities(&self) -> &QuantityMap {
        &self.quantities
    }

    pub fn quantity(&self, id: &str) -> u32 {
        self.quantities.get(id).copied().unwrap_or(0)
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Set the count for a known type. Negative input is clamped to 0;
    /// unknown ids are ignored.
    pub fn set_quantity(&mut self, id: &str, qty: i64) -> bool {
        if !self.catalog.contains(id) {
            tracing::debug!(id, "ignoring quantity for unknown container type");
            return false;
        }
        let qty = clamp_quantity(qty);
        if qty == self.quantity(id) {
            return false;
        }
        if qty == 0 {
            self.quantities.remove(id);
        } else {
            self.quantities.insert(id.to_owned(), qty);
        }
        true
    }

    pub fn add_custom_type(&mut self, name: &str, weight: f64) -> Result<ContainerType, InputError> {
        self.catalog.add_custom(name, weight)
    }

    /// Remove a custom type together with its quantity entry.
    ///
    /// Returns the removed type and whether a quantity entry went with it.
    pub fn delete_type(&mut self, id: &str) -> Option<(ContainerType, bool)> {
        let removed = self.catalog.remove_custom(id)?;
        let had_quantity = self.quantities.remove(id).is_some();
        Some((removed, had_quantity))
    }

    /// Set the capacity, clamped to at least 1.
    pub fn set_capacity(&mut self, value: i64) -> bool {
        let value = clamp_capacity(value);
        if value == self.capacity {
            return false;
        }
        self.capacity = value;
        true
    }

    /// Empty the quantity map. Custom types and capacity are kept.
    pub fn clear_quantities(&mut self) -> usize {
        let cleared = self.quantities.len();
        self.quantities.clear();
        cleared
    }

    pub fn total_weight(&self) -> f64 {
        total_weight(self.catalog.all_types(), &self.quantities)
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.total_weight(), self.capacity)
    }

    pub fn remaining(&self) -> f64 {
        remaining(self.total_weight(), self.capacity)
    }

    pub fn snapshot(&self) -> LoadSnapshot {
        LoadSnapshot {
            types: self.catalog.all_types().cloned().collect(),
            quantities: self.quantities.clone(),
            capacity: self.capacity,
            total_weight: self.total_weight(),
            revision: 0,
        }
    }
}
