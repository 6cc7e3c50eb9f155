use serde::{Deserialize, Serialize};

/// Default truck capacity in kilograms (a standard 1000 kg van).
pub const DEFAULT_CAPACITY_KG: u64 = 1000;

/// Prefix for identifiers of user-defined container types.
pub const CUSTOM_ID_PREFIX: &str = "custom-";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Container type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A named class of cargo item with a fixed unit weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerType {
    pub id: String,
    pub name: String,
    /// Unit weight in kilograms. Always positive and finite.
    pub weight: f64,
    /// `true` for user-defined types, `false` for built-ins.
    #[serde(default, alias = "isCustom")]
    pub custom: bool,
}

impl ContainerType {
    pub fn builtin(id: &str, name: &str, weight: f64) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            weight,
            custom: false,
        }
    }

    pub fn custom(id: String, name: String, weight: f64) -> Self {
        Self {
            id,
            name,
            weight,
            custom: true,
        }
    }
}

/// The built-in container types, in display order.
pub fn builtin_types() -> Vec<ContainerType> {
    vec![
        ContainerType::builtin("box-1", "Large box", 15.0),
        ContainerType::builtin("box-2", "Medium box", 8.5),
        ContainerType::builtin("box-3", "Small box", 5.0),
    ]
}

/// Whether `weight` is acceptable as a unit weight.
pub fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}
