use serde::{Deserialize, Serialize};

use super::convert;
use super::error::{ValidationError, ensure_finite, ensure_in_range, ensure_non_negative};

pub const ALLOCATION_SUM_TOLERANCE: f64 = 0.01;
pub const MAX_LIFESPAN: u32 = 150;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    DebtElimination,
    EmergencyFund,
    RetirementPrep,
    Retired,
}

/// Debt/savings/investment split in percent (0-100).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseAllocation {
    pub debt: f64,
    pub savings: f64,
    pub investment: f64,
}

/// Post-debt split in percent; debt allocation is implicitly 0.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthAllocation {
    pub savings: f64,
    pub investment: f64,
}

impl From<GrowthAllocation> for PhaseAllocation {
    fn from(value: GrowthAllocation) -> Self {
        PhaseAllocation {
            debt: 0.0,
            savings: value.savings,
            investment: value.investment,
        }
    }
}

impl PhaseAllocation {
    pub fn total(&self) -> f64 {
        self.debt + self.savings + self.investment
    }

    pub fn to_fractions(self) -> AllocationFractions {
        AllocationFractions {
            debt: self.debt / 100.0,
            savings: self.savings / 100.0,
            investment: self.investment / 100.0,
        }
    }

    /// `fields` names the debt, savings and investment shares in errors.
    fn validate(&self, phase: &'static str, fields: [&'static str; 3]) -> Result<(), ValidationError> {
        let [debt, savings, investment] = fields;
        ensure_in_range(debt, self.debt, 0.0, 100.0)?;
        ensure_in_range(savings, self.savings, 0.0, 100.0)?;
        ensure_in_range(investment, self.investment, 0.0, 100.0)?;
        let total = self.total();
        if (total - 100.0).abs() > ALLOCATION_SUM_TOLERANCE {
            return Err(ValidationError::AllocationSum { phase, total });
        }
        Ok(())
    }
}

/// Allocation percentages normalized to fractions in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AllocationFractions {
    pub debt: f64,
    pub savings: f64,
    pub investment: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonthlyExpenses {
    pub housing: f64,
    pub utilities: f64,
    pub food: f64,
    pub transportation: f64,
    pub healthcare: f64,
    pub insurance: f64,
    pub entertainment: f64,
    pub personal_care: f64,
    pub education: f64,
    pub clothing: f64,
    pub travel: f64,
    pub other: f64,
}

impl MonthlyExpenses {
    fn categories(&self) -> [(&'static str, f64); 12] {
        [
            ("monthlyExpenses.housing", self.housing),
            ("monthlyExpenses.utilities", self.utilities),
            ("monthlyExpenses.food", self.food),
            ("monthlyExpenses.transportation", self.transportation),
            ("monthlyExpenses.healthcare", self.healthcare),
            ("monthlyExpenses.insurance", self.insurance),
            ("monthlyExpenses.entertainment", self.entertainment),
            ("monthlyExpenses.personalCare", self.personal_care),
            ("monthlyExpenses.education", self.education),
            ("monthlyExpenses.clothing", self.clothing),
            ("monthlyExpenses.travel", self.travel),
            ("monthlyExpenses.other", self.other),
        ]
    }

    pub fn total(&self) -> f64 {
        self.categories().iter().map(|(_, amount)| amount).sum()
    }

    pub fn annual(&self) -> f64 {
        self.total() * 12.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialInputs {
    /// Monthly gross salary in the source currency.
    pub gross_salary_usd: f64,
    pub eur_usd_rate: f64,
    pub thb_eur_rate: f64,
    /// Flat salary tax as a fraction, charged once `tax_free_years` have elapsed.
    pub tax_rate: f64,
    pub tax_free_years: u32,
    pub monthly_expenses: MonthlyExpenses,
    pub total_debt: f64,
    pub total_savings: f64,
    pub total_investments: f64,
    pub current_age: u32,
    pub lifespan: u32,
    pub retirement_age: u32,
    /// Annual return in percent.
    pub investment_return_rate: f64,
    pub emergency_fund_months: f64,
    pub phase1: PhaseAllocation,
    pub phase2: PhaseAllocation,
    pub phase3: GrowthAllocation,
}

impl FinancialInputs {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("grossSalaryUsd", self.gross_salary_usd)?;
        for (field, rate) in [
            ("eurUsdRate", self.eur_usd_rate),
            ("thbEurRate", self.thb_eur_rate),
        ] {
            ensure_non_negative(field, rate)?;
            if rate == 0.0 {
                return Err(ValidationError::OutOfRange {
                    field,
                    value: rate,
                    min: f64::MIN_POSITIVE,
                    max: f64::MAX,
                });
            }
        }
        ensure_in_range("taxRate", self.tax_rate, 0.0, 1.0)?;
        for (field, amount) in self.monthly_expenses.categories() {
            ensure_non_negative(field, amount)?;
        }
        ensure_non_negative("totalDebt", self.total_debt)?;
        ensure_non_negative("totalSavings", self.total_savings)?;
        ensure_non_negative("totalInvestments", self.total_investments)?;
        ensure_non_negative("emergencyFundMonths", self.emergency_fund_months)?;
        ensure_finite("investmentReturnRate", self.investment_return_rate)?;
        if self.investment_return_rate <= -100.0 {
            return Err(ValidationError::OutOfRange {
                field: "investmentReturnRate",
                value: self.investment_return_rate,
                min: -100.0,
                max: f64::MAX,
            });
        }

        if self.lifespan > MAX_LIFESPAN {
            return Err(ValidationError::AgeOrder {
                field: "lifespan",
                reason: format!("must be <= {MAX_LIFESPAN}"),
            });
        }
        if self.current_age > self.lifespan {
            return Err(ValidationError::AgeOrder {
                field: "currentAge",
                reason: "must be <= lifespan".to_string(),
            });
        }
        if self.retirement_age < self.current_age || self.retirement_age > self.lifespan {
            return Err(ValidationError::AgeOrder {
                field: "retirementAge",
                reason: "must be between currentAge and lifespan".to_string(),
            });
        }

        self.phase1.validate(
            "phase1",
            ["phase1.debt", "phase1.savings", "phase1.investment"],
        )?;
        self.phase2.validate(
            "phase2",
            ["phase2.debt", "phase2.savings", "phase2.investment"],
        )?;
        PhaseAllocation::from(self.phase3).validate(
            "phase3",
            ["phase3.debt", "phase3.savings", "phase3.investment"],
        )?;
        Ok(())
    }

    pub fn gross_monthly_local(&self) -> f64 {
        convert::gross_monthly_local(self.gross_salary_usd, self.eur_usd_rate, self.thb_eur_rate)
    }

    pub fn annual_expenses(&self) -> f64 {
        self.monthly_expenses.annual()
    }

    pub fn emergency_fund_target(&self) -> f64 {
        self.emergency_fund_months * self.monthly_expenses.total()
    }

    pub fn simulated_years(&self) -> u32 {
        self.lifespan - self.current_age + 1
    }
}

/// Everything the year processor needs to advance one year.
#[derive(Debug, Clone, Copy)]
pub struct SimulationYearParams {
    pub age: u32,
    pub years_elapsed: u32,
    pub retirement_age: u32,
    pub lifespan: u32,
    pub debt: f64,
    pub savings: f64,
    pub investments: f64,
    pub gross_annual_salary: f64,
    pub tax_rate: f64,
    pub tax_free_years: u32,
    pub annual_expenses: f64,
    /// Annual return as a fraction.
    pub return_rate: f64,
    pub emergency_fund_target: f64,
    pub phase1: AllocationFractions,
    pub phase2: AllocationFractions,
    pub phase3: AllocationFractions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationYearResult {
    pub phase: Phase,
    pub debt: f64,
    pub savings: f64,
    pub investments: f64,
    pub is_retired: bool,
    pub free_capital: f64,
    pub gross_income: f64,
    pub net_income: f64,
    pub income_tax: f64,
    pub annual_expenses: f64,
    pub gross_investment_income: f64,
    pub net_investment_income: f64,
    pub debt_payment: f64,
    pub savings_contribution: f64,
    pub investment_contribution: f64,
    pub savings_withdrawal: f64,
    pub investment_sale: f64,
    pub safe_withdrawal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySimulationData {
    pub age: u32,
    pub years_from_now: u32,
    pub phase: Phase,
    pub is_retired: bool,
    pub gross_income: f64,
    pub net_income: f64,
    pub income_tax: f64,
    pub annual_expenses: f64,
    pub free_capital: f64,
    pub gross_investment_income: f64,
    pub net_investment_income: f64,
    pub debt_payment: f64,
    pub savings_contribution: f64,
    pub investment_contribution: f64,
    pub savings_withdrawal: f64,
    pub investment_sale: f64,
    pub safe_withdrawal: f64,
    pub debt: f64,
    pub savings: f64,
    pub investments: f64,
    pub total_wealth: f64,
    pub net_worth: f64,
}

impl YearlySimulationData {
    pub fn from_year(age: u32, years_from_now: u32, year: &SimulationYearResult) -> Self {
        Self {
            age,
            years_from_now,
            phase: year.phase,
            is_retired: year.is_retired,
            gross_income: year.gross_income,
            net_income: year.net_income,
            income_tax: year.income_tax,
            annual_expenses: year.annual_expenses,
            free_capital: year.free_capital,
            gross_investment_income: year.gross_investment_income,
            net_investment_income: year.net_investment_income,
            debt_payment: year.debt_payment,
            savings_contribution: year.savings_contribution,
            investment_contribution: year.investment_contribution,
            savings_withdrawal: year.savings_withdrawal,
            investment_sale: year.investment_sale,
            safe_withdrawal: year.safe_withdrawal,
            debt: year.debt,
            savings: year.savings,
            investments: year.investments,
            total_wealth: year.savings + year.investments,
            net_worth: year.savings + year.investments - year.debt,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseBuckets {
    pub debt: Vec<YearlySimulationData>,
    pub emergency: Vec<YearlySimulationData>,
    pub retirement: Vec<YearlySimulationData>,
    pub post_retirement: Vec<YearlySimulationData>,
}

impl PhaseBuckets {
    pub fn bucket(&self, phase: Phase) -> &[YearlySimulationData] {
        match phase {
            Phase::DebtElimination => &self.debt,
            Phase::EmergencyFund => &self.emergency,
            Phase::RetirementPrep => &self.retirement,
            Phase::Retired => &self.post_retirement,
        }
    }

    pub(crate) fn push(&mut self, row: YearlySimulationData) {
        match row.phase {
            Phase::DebtElimination => self.debt.push(row),
            Phase::EmergencyFund => self.emergency.push(row),
            Phase::RetirementPrep => self.retirement.push(row),
            Phase::Retired => self.post_retirement.push(row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthSimulationResult {
    pub trajectory: Vec<YearlySimulationData>,
    pub phases: PhaseBuckets,
    pub final_wealth: f64,
    pub retirement_age: u32,
    pub total_years: u32,
    pub debt_free_age: Option<u32>,
    pub emergency_fund_age: Option<u32>,
    pub wealth_depleted_age: Option<u32>,
}
