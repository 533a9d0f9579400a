use super::error::{ValidationError, ensure_finite, ensure_in_range, ensure_non_negative};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub debt: f64,
    pub savings: f64,
    pub investment: f64,
}

impl Allocation {
    pub fn total(self) -> f64 {
        self.debt + self.savings + self.investment
    }
}

/// Splits `free_capital` by fractional percentages. A negative amount (a
/// shortfall year) is split the same way. No rounding happens here.
pub fn allocate(
    free_capital: f64,
    pct_debt: f64,
    pct_savings: f64,
    pct_investment: f64,
) -> Result<Allocation, ValidationError> {
    ensure_finite("freeCapital", free_capital)?;
    ensure_in_range("pctDebt", pct_debt, 0.0, 1.0)?;
    ensure_in_range("pctSavings", pct_savings, 0.0, 1.0)?;
    ensure_in_range("pctInvestment", pct_investment, 0.0, 1.0)?;

    Ok(Allocation {
        debt: free_capital * pct_debt,
        savings: free_capital * pct_savings,
        investment: free_capital * pct_investment,
    })
}

/// Payment actually applied to debt: never negative, never more than what is owed.
pub fn debt_payment(debt_remaining: f64, available_payment: f64) -> Result<f64, ValidationError> {
    ensure_non_negative("debtRemaining", debt_remaining)?;
    ensure_finite("availablePayment", available_payment)?;
    Ok(available_payment.max(0.0).min(debt_remaining))
}
