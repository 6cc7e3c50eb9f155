//! Container catalog: built-in types plus user-defined ones.

use std::collections::HashSet;

use chrono::Utc;

use cs_domain::container::{builtin_types, is_valid_weight, CUSTOM_ID_PREFIX};
use cs_domain::{ContainerType, InputError};

/// Built-in container types (fixed order) followed by custom types
/// (creation order). Identifiers are unique across both sets.
#[derive(Debug, Clone)]
pub struct Catalog {
    builtins: Vec<ContainerType>,
    customs: Vec<ContainerType>,
    /// Last millisecond stamp handed out for a custom id.
    last_stamp: i64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// A catalog holding only the built-in types.
    pub fn new() -> Self {
        Self {
            builtins: builtin_types(),
            customs: Vec::new(),
            last_stamp: 0,
        }
    }

    /// Build a catalog from persisted custom types.
    ///
    /// Entries that would break the catalog invariants (empty name, bad
    /// weight, duplicate id) are dropped with a warning.
    pub fn with_customs(customs: Vec<ContainerType>) -> Self {
        let mut catalog = Self::new();
        let mut seen: HashSet<String> = catalog.builtins.iter().map(|t| t.id.clone()).collect();

        for mut entry in customs {
            let name = entry.name.trim().to_owned();
            if name.is_empty() || !is_valid_weight(entry.weight) || entry.id.is_empty() {
                tracing::warn!(id = %entry.id, "dropping invalid persisted container type");
                continue;
            }
            if !seen.insert(entry.id.clone()) {
                tracing::warn!(id = %entry.id, "dropping duplicate persisted container type");
                continue;
            }
            entry.name = name;
            entry.custom = true;
            if let Some(stamp) = id_stamp(&entry.id) {
                catalog.last_stamp = catalog.last_stamp.max(stamp);
            }
            catalog.customs.push(entry);
        }

        catalog
    }

    /// All types: built-ins first, then custom types in creation order.
    pub fn all_types(&self) -> impl Iterator<Item = &ContainerType> {
        self.builtins.iter().chain(self.customs.iter())
    }

    pub fn builtins(&self) -> &[ContainerType] {
        &self.builtins
    }

    pub fn customs(&self) -> &[ContainerType] {
        &self.customs
    }

    pub fn get(&self, id: &str) -> Option<&ContainerType> {
        self.all_types().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Create a user-defined type and append it to the catalog.
    pub fn add_custom(&mut self, name: &str, weight: f64) -> Result<ContainerType, InputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InputError::EmptyName);
        }
        if !is_valid_weight(weight) {
            return Err(InputError::InvalidWeight(weight.to_string()));
        }

        let entry = ContainerType::custom(self.next_id(), name.to_owned(), weight);
        self.customs.push(entry.clone());
        Ok(entry)
    }

    /// Remove a user-defined type. Built-in and unknown ids are left alone.
    pub fn remove_custom(&mut self, id: &str) -> Option<ContainerType> {
        let idx = self.customs.iter().position(|t| t.id == id)?;
        Some(self.customs.remove(idx))
    }

    /// Time-based id, bumped past the last one so ids never repeat even
    /// when two types are added within the same millisecond.
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        // A persisted id may already hold i64::MAX; restart from the clock then.
        let mut stamp = match self.last_stamp.checked_add(1) {
            Some(next) => now.max(next),
            None => now,
        };
        while self.contains(&format!("{CUSTOM_ID_PREFIX}{stamp}")) {
            stamp = stamp.saturating_add(1);
        }
        self.last_stamp = stamp;
        format!("{CUSTOM_ID_PREFIX}{stamp}")
    }
}

fn id_stamp(id: &str) -> Option<i64> {
    id.strip_prefix(CUSTOM_ID_PREFIX)?.parse().ok()
}

/// Parse a weight typed by the user (decimal, e.g. `"12.5"`).
pub fn parse_weight(input: &str) -> Result<f64, InputError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(w) if is_valid_weight(w) => Ok(w),
        _ => Err(InputError::InvalidWeight(trimmed.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_catalog_lists_builtins_in_order() {
        let catalog = Catalog::new();
        let ids: Vec<&str> = catalog.all_types().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["box-1", "box-2", "box-3"]);
        assert!(catalog.customs().is_empty());
    }

    #[test]
    fn add_custom_appends_after_builtins() {
        let mut catalog = Catalog::new();
        let tools = catalog.add_custom("Tools", 12.5).unwrap();
        let spares = catalog.add_custom("  Spares ", 3.0).unwrap();

        assert!(tools.custom);
        assert!(tools.id.starts_with(CUSTOM_ID_PREFIX));
        assert_eq!(spares.name, "Spares");
        assert_ne!(tools.id, spares.id);

        let names: Vec<&str> = catalog.all_types().map(|t| t.name.as_str()).collect();
        assert_eq!(names[3..], ["Tools", "Spares"]);
    }

    #[test]
    fn rapid_adds_get_unique_ids() {
        let mut catalog = Catalog::new();
        let ids: HashSet<String> = (0..50)
            .map(|i| catalog.add_custom(&format!("t{i}"), 1.0).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn add_custom_rejects_bad_input() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.add_custom("", 5.0), Err(InputError::EmptyName));
        assert_eq!(catalog.add_custom("   ", 5.0), Err(InputError::EmptyName));
        assert!(matches!(
            catalog.add_custom("Tools", 0.0),
            Err(InputError::InvalidWeight(_))
        ));
        assert!(matches!(
            catalog.add_custom("Tools", f64::NAN),
            Err(InputError::InvalidWeight(_))
        ));
        assert!(catalog.customs().is_empty());
    }

    #[test]
    fn remove_custom_ignores_builtins_and_unknown_ids() {
        let mut catalog = Catalog::new();
        assert!(catalog.remove_custom("box-1").is_none());
        assert!(catalog.remove_custom("custom-404").is_none());
        assert_eq!(catalog.all_types().count(), 3);

        let tools = catalog.add_custom("Tools", 12.5).unwrap();
        let removed = catalog.remove_custom(&tools.id).unwrap();
        assert_eq!(removed.name, "Tools");
        assert!(!catalog.contains(&tools.id));
    }

    #[test]
    fn with_customs_sanitizes_persisted_entries() {
        let persisted = vec![
            ContainerType::custom("custom-10".into(), "Tools".into(), 12.5),
            ContainerType::custom("custom-10".into(), "Dup".into(), 1.0),
            ContainerType::custom("box-1".into(), "Shadow".into(), 1.0),
            ContainerType::custom("custom-11".into(), "  ".into(), 1.0),
            ContainerType::custom("custom-12".into(), "Bad".into(), -2.0),
            ContainerType {
                id: "custom-13".into(),
                name: "Flag".into(),
                weight: 2.0,
                custom: false,
            },
        ];
        let catalog = Catalog::with_customs(persisted);
        let ids: Vec<&str> = catalog.customs().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["custom-10", "custom-13"]);
        assert!(catalog.customs().iter().all(|t| t.custom));
        assert_eq!(catalog.get("box-1").map(|t| t.name.as_str()), Some("Large box"));
    }

    #[test]
    fn new_ids_never_reuse_persisted_stamps() {
        let future = Utc::now().timestamp_millis() + 60_000;
        let persisted = vec![ContainerType::custom(
            format!("custom-{future}"),
            "Later".into(),
            1.0,
        )];
        let mut catalog = Catalog::with_customs(persisted);
        let added = catalog.add_custom("Now", 1.0).unwrap();
        assert_eq!(added.id, format!("custom-{}", future + 1));
    }

    #[test]
    fn maximal_persisted_stamp_does_not_overflow() {
        let corrupt = format!("custom-{}", i64::MAX);
        let persisted = vec![ContainerType::custom(corrupt.clone(), "Corrupt".into(), 1.0)];
        let mut catalog = Catalog::with_customs(persisted);

        let first = catalog.add_custom("Now", 1.0).unwrap();
        let second = catalog.add_custom("Later", 1.0).unwrap();
        assert!(first.id.starts_with("custom-") && !first.id.starts_with("custom--"));
        assert_ne!(first.id, corrupt);
        assert_ne!(second.id, corrupt);
        assert_ne!(first.id, second.id);
        assert_eq!(catalog.customs().len(), 3);
    }

    #[test]
    fn parse_weight_accepts_decimals_only_when_positive() {
        assert_eq!(parse_weight(" 12.5 "), Ok(12.5));
        assert!(parse_weight("0").is_err());
        assert!(parse_weight("-1").is_err());
        assert!(parse_weight("heavy").is_err());
        assert!(parse_weight("inf").is_err());
    }
}
