use serde::{Deserialize, Serialize};

/// The four numeric inputs of a calculation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingParameters {
    /// Charged per usage token
    pub unit_shuttle_cost: f64,
    /// Flat fee per active player
    pub walk_in_fee: f64,
    /// Court rental added to the legacy total
    pub court_fee: f64,
    /// Real cost of one shuttle, used by the legacy total
    pub actual_unit_shuttle_cost: f64,
}

impl Default for PricingParameters {
    fn default() -> Self {
        PricingParameters {
            unit_shuttle_cost: 20.0,
            walk_in_fee: 60.0,
            court_fee: 0.0,
            actual_unit_shuttle_cost: 0.0,
        }
    }
}

impl PricingParameters {
    /// Price of a row holding `tokens` usage tokens.
    pub fn row_price(&self, tokens: u64) -> f64 {
        tokens as f64 * self.unit_shuttle_cost + self.walk_in_fee
    }
}

/// How usage is marked in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TallyRules {
    /// Character counted as one unit of usage
    pub token: char,
    /// Tokens making up one shuttle, one per player on a court
    pub tokens_per_unit: u32,
}

impl Default for TallyRules {
    fn default() -> Self {
        TallyRules {
            token: 'l',
            tokens_per_unit: 4,
        }
    }
}

impl TallyRules {
    /// Group size, never below one.
    fn group_size(&self) -> u32 {
        self.tokens_per_unit.max(1)
    }

    /// Shuttles used for `tokens` usage tokens; fractional units are kept.
    pub fn units(&self, tokens: u64) -> f64 {
        tokens as f64 / f64::from(self.group_size())
    }

    /// Whether `tokens` splits into whole groups.
    pub fn is_balanced(&self, tokens: u64) -> bool {
        tokens % u64::from(self.group_size()) == 0
    }
}
