//! Feature-driven context signal.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ScoringConfigError;

/// Bonus granted when a place lists `feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBonus {
    /// Feature label matched exactly, e.g. `"wifi"`.
    pub feature: String,
    /// Amount added to the base value.
    pub bonus: f64,
}

impl ContextBonus {
    /// Build a bonus for `feature`.
    pub fn new(feature: impl Into<String>, bonus: f64) -> Self {
        Self {
            feature: feature.into(),
            bonus,
        }
    }
}

/// Rules turning a place's features into the context signal.
///
/// The signal starts at `base`, adds every bonus whose feature the place
/// lists, and is capped at `cap`.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use nearby_scorer::ContextRules;
///
/// let rules = ContextRules::default();
/// let features: BTreeSet<String> = ["wifi".to_owned()].into_iter().collect();
/// assert!((rules.evaluate(&features) - 0.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRules {
    /// Value for a place with no matching features.
    pub base: f64,
    /// Additive bonuses keyed by feature.
    pub bonuses: Vec<ContextBonus>,
    /// Upper bound of the signal.
    pub cap: f64,
}

/// Base `0.5` with `vegetarian: +0.15` and `wifi: +0.10`, capped at `1.0`.
///
/// A place with both features reaches `0.75`, not the full `1.0`; a context
/// contribution of `1.0` (a breakdown total of `10.0`) needs larger bonuses.
impl Default for ContextRules {
    fn default() -> Self {
        Self {
            base: 0.5,
            bonuses: vec![
                ContextBonus::new("vegetarian", 0.15),
                ContextBonus::new("wifi", 0.10),
            ],
            cap: 1.0,
        }
    }
}

impl ContextRules {
    /// Validate the rules and return them.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError::InvalidContextRules`] when the base, the
    /// cap or any bonus is negative or not finite.
    pub fn validate(self) -> Result<Self, ScoringConfigError> {
        let usable = |value: f64| value.is_finite() && value >= 0.0;
        if !usable(self.base) {
            return Err(ScoringConfigError::InvalidContextRules { reason: "base" });
        }
        if !usable(self.cap) {
            return Err(ScoringConfigError::InvalidContextRules { reason: "cap" });
        }
        if !self.bonuses.iter().all(|entry| usable(entry.bonus)) {
            return Err(ScoringConfigError::InvalidContextRules { reason: "bonus" });
        }
        Ok(self)
    }

    /// Compute the context signal for `features`.
    #[expect(
        clippy::float_arithmetic,
        reason = "context signal sums matching feature bonuses"
    )]
    #[must_use]
    pub fn evaluate(&self, features: &BTreeSet<String>) -> f64 {
        let bonus: f64 = self
            .bonuses
            .iter()
            .filter(|entry| features.contains(&entry.feature))
            .map(|entry| entry.bonus)
            .sum();
        (self.base + bonus).min(self.cap)
    }
}
