use super::error::{ValidationError, ensure_finite, ensure_non_negative};

/// Positive when expenses exceed passive income.
pub fn shortfall(expenses: f64, investment_income: f64) -> f64 {
    expenses - investment_income
}

/// Conservative withdrawal limit for one retirement year.
///
/// Reserves `(years_remaining - 1) * expenses` for the years still to come and
/// only allows drawing on what is left above that reserve. The reserve is a
/// one-step lookahead; it is not recomputed as the portfolio moves later.
pub fn max_withdrawal(
    expenses: f64,
    investment_income: f64,
    total_wealth: f64,
    years_remaining: u32,
) -> Result<f64, ValidationError> {
    ensure_non_negative("expenses", expenses)?;
    ensure_finite("investmentIncome", investment_income)?;
    ensure_finite("totalWealth", total_wealth)?;

    let needed = shortfall(expenses, investment_income);
    if needed <= 0.0 {
        return Ok(0.0);
    }

    let future_needs = years_remaining.saturating_sub(1) as f64 * expenses;
    let available = (total_wealth - future_needs).max(0.0);
    Ok(needed.min(available))
}
