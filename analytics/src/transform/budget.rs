//! Budget tiers.

use crate::error::{InputError, InputResult};
use crate::models::BudgetTier;

/// Largest budget still classed as micro.
pub const MICRO_BUDGET_MAX: f64 = 396_000.0;

/// Largest budget still classed as low.
pub const LOW_BUDGET_MAX: f64 = 2_100_000.0;

/// Classify a budget. Upper bounds are inclusive.
///
/// Negative, NaN or infinite budgets are rejected rather than classified.
pub fn classify(budget: f64) -> InputResult<BudgetTier> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(InputError::InvalidBudget(budget));
    }
    Ok(if budget <= MICRO_BUDGET_MAX {
        BudgetTier::Micro
    } else if budget <= LOW_BUDGET_MAX {
        BudgetTier::Low
    } else {
        BudgetTier::Normal
    })
}
