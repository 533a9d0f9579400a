use super::allocation::{allocate, debt_payment};
use super::error::ValidationError;
use super::phase::classify_phase;
use super::retirement::{max_withdrawal, shortfall};
use super::types::{
    AllocationFractions, FinancialInputs, Phase, PhaseAllocation, PhaseBuckets,
    SimulationYearParams, SimulationYearResult, WealthSimulationResult, YearlySimulationData,
};

#[derive(Debug, Clone, Copy)]
struct InvestmentIncome {
    gross: f64,
    net: f64,
}

/// Advances the ledger by one year.
///
/// The year with `years_elapsed == 0` is today's snapshot and changes nothing.
pub fn process_year(params: &SimulationYearParams) -> Result<SimulationYearResult, ValidationError> {
    let phase = classify_phase(
        params.age,
        params.retirement_age,
        params.debt,
        params.savings,
        params.emergency_fund_target,
    );

    if params.years_elapsed == 0 {
        return Ok(snapshot_year(params, phase));
    }

    let gross = params.investments.max(0.0) * params.return_rate;
    let income = InvestmentIncome {
        gross,
        net: gross * (1.0 - params.tax_rate),
    };

    match phase {
        Phase::Retired => run_retirement_year(params, income),
        Phase::DebtElimination => run_working_year(params, phase, params.phase1, income),
        Phase::EmergencyFund => run_working_year(params, phase, params.phase2, income),
        Phase::RetirementPrep => run_working_year(params, phase, params.phase3, income),
    }
}

fn snapshot_year(params: &SimulationYearParams, phase: Phase) -> SimulationYearResult {
    SimulationYearResult {
        phase,
        debt: params.debt,
        savings: params.savings,
        investments: params.investments,
        is_retired: phase == Phase::Retired,
        free_capital: 0.0,
        gross_income: 0.0,
        net_income: 0.0,
        income_tax: 0.0,
        annual_expenses: 0.0,
        gross_investment_income: 0.0,
        net_investment_income: 0.0,
        debt_payment: 0.0,
        savings_contribution: 0.0,
        investment_contribution: 0.0,
        savings_withdrawal: 0.0,
        investment_sale: 0.0,
        safe_withdrawal: 0.0,
    }
}

fn run_working_year(
    params: &SimulationYearParams,
    phase: Phase,
    fractions: AllocationFractions,
    income: InvestmentIncome,
) -> Result<SimulationYearResult, ValidationError> {
    let gross_income = params.gross_annual_salary;
    // The snapshot year counts toward the tax-free period.
    let income_tax = if params.years_elapsed >= params.tax_free_years {
        gross_income * params.tax_rate
    } else {
        0.0
    };
    let net_income = gross_income - income_tax;
    let free_capital = net_income - params.annual_expenses + income.net;

    let split = allocate(
        free_capital,
        fractions.debt,
        fractions.savings,
        fractions.investment,
    )?;
    let paid = debt_payment(params.debt, split.debt)?;
    // Whatever the debt share could not pay off lands in savings.
    let savings_contribution = split.savings + (split.debt - paid);
    let investment_contribution = split.investment;

    Ok(SimulationYearResult {
        phase,
        debt: params.debt - paid,
        savings: params.savings + savings_contribution,
        investments: params.investments + investment_contribution,
        is_retired: false,
        free_capital,
        gross_income,
        net_income,
        income_tax,
        annual_expenses: params.annual_expenses,
        gross_investment_income: income.gross,
        net_investment_income: income.net,
        debt_payment: paid,
        savings_contribution,
        investment_contribution,
        savings_withdrawal: 0.0,
        investment_sale: 0.0,
        safe_withdrawal: 0.0,
    })
}

fn run_retirement_year(
    params: &SimulationYearParams,
    income: InvestmentIncome,
) -> Result<SimulationYearResult, ValidationError> {
    let expenses = params.annual_expenses;
    let needed = shortfall(expenses, income.net);
    let years_remaining = params.lifespan.saturating_sub(params.age) + 1;
    let safe_withdrawal = max_withdrawal(
        expenses,
        income.net,
        params.savings + params.investments,
        years_remaining,
    )?;

    let mut year = SimulationYearResult {
        phase: Phase::Retired,
        debt: params.debt,
        savings: params.savings,
        investments: params.investments,
        is_retired: true,
        free_capital: 0.0,
        gross_income: 0.0,
        net_income: 0.0,
        income_tax: 0.0,
        annual_expenses: expenses,
        gross_investment_income: income.gross,
        net_investment_income: income.net,
        debt_payment: 0.0,
        savings_contribution: 0.0,
        investment_contribution: 0.0,
        savings_withdrawal: 0.0,
        investment_sale: 0.0,
        safe_withdrawal,
    };

    if needed <= 0.0 {
        let surplus = -needed;
        let split = allocate(
            surplus,
            params.phase3.debt,
            params.phase3.savings,
            params.phase3.investment,
        )?;
        year.free_capital = surplus;
        year.savings_contribution = split.savings + split.debt;
        year.investment_contribution = split.investment;
        year.savings += year.savings_contribution;
        year.investments += year.investment_contribution;
        return Ok(year);
    }

    // Savings are drawn down first; investments cover the rest and may go
    // negative once everything is spent.
    let from_savings = needed.min(params.savings.max(0.0));
    let from_investments = needed - from_savings;
    year.savings_withdrawal = from_savings;
    year.investment_sale = from_investments;
    year.savings -= from_savings;
    year.investments -= from_investments;
    year.free_capital = -(from_savings + from_investments);
    Ok(year)
}

pub fn simulate(inputs: &FinancialInputs) -> Result<WealthSimulationResult, ValidationError> {
    inputs.validate()?;
    run_trajectory(inputs, inputs.retirement_age)
}

/// Runs the year loop for already validated inputs with `retirement_age`
/// substituted.
pub(crate) fn run_trajectory(
    inputs: &FinancialInputs,
    retirement_age: u32,
) -> Result<WealthSimulationResult, ValidationError> {
    let base = year_params(inputs, retirement_age);
    let mut debt = inputs.total_debt;
    let mut savings = inputs.total_savings;
    let mut investments = inputs.total_investments;

    let mut trajectory = Vec::with_capacity(inputs.simulated_years() as usize);
    let mut debt_free_age = None;
    let mut emergency_fund_age = None;
    let mut wealth_depleted_age = None;

    for (years_elapsed, age) in (inputs.current_age..=inputs.lifespan).enumerate() {
        let params = SimulationYearParams {
            age,
            years_elapsed: years_elapsed as u32,
            debt,
            savings,
            investments,
            ..base
        };
        let year = process_year(&params)?;
        debt = year.debt;
        savings = year.savings;
        investments = year.investments;

        let row = YearlySimulationData::from_year(age, years_elapsed as u32, &year);
        if debt_free_age.is_none() && row.debt <= 0.0 {
            debt_free_age = Some(age);
        }
        if emergency_fund_age.is_none() && row.savings >= base.emergency_fund_target {
            emergency_fund_age = Some(age);
        }
        if wealth_depleted_age.is_none() && row.total_wealth < 0.0 {
            wealth_depleted_age = Some(age);
        }
        trajectory.push(row);
    }

    let phases = partition_by_phase(&trajectory);
    let final_wealth = savings + investments;

    tracing::debug!(
        current_age = inputs.current_age,
        lifespan = inputs.lifespan,
        retirement_age,
        final_wealth,
        ?wealth_depleted_age,
        "simulation complete"
    );

    Ok(WealthSimulationResult {
        total_years: trajectory.len() as u32,
        trajectory,
        phases,
        final_wealth,
        retirement_age,
        debt_free_age,
        emergency_fund_age,
        wealth_depleted_age,
    })
}

/// Stable partition of a trajectory into its phase buckets.
pub fn partition_by_phase(trajectory: &[YearlySimulationData]) -> PhaseBuckets {
    let mut buckets = PhaseBuckets::default();
    for row in trajectory {
        buckets.push(row.clone());
    }
    buckets
}

fn year_params(inputs: &FinancialInputs, retirement_age: u32) -> SimulationYearParams {
    SimulationYearParams {
        age: inputs.current_age,
        years_elapsed: 0,
        retirement_age,
        lifespan: inputs.lifespan,
        debt: inputs.total_debt,
        savings: inputs.total_savings,
        investments: inputs.total_investments,
        gross_annual_salary: inputs.gross_monthly_local() * 12.0,
        tax_rate: inputs.tax_rate,
        tax_free_years: inputs.tax_free_years,
        annual_expenses: inputs.annual_expenses(),
        return_rate: inputs.investment_return_rate / 100.0,
        emergency_fund_target: inputs.emergency_fund_target(),
        phase1: inputs.phase1.to_fractions(),
        phase2: inputs.phase2.to_fractions(),
        phase3: PhaseAllocation::from(inputs.phase3).to_fractions(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::types::{GrowthAllocation, MonthlyExpenses};
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    pub(crate) fn sample_inputs() -> FinancialInputs {
        FinancialInputs {
            gross_salary_usd: 9_000.0,
            eur_usd_rate: 1.17,
            thb_eur_rate: 37.75,
            tax_rate: 0.17,
            tax_free_years: 2,
            monthly_expenses: MonthlyExpenses {
                housing: 25_000.0,
                utilities: 3_000.0,
                food: 12_000.0,
                transportation: 4_000.0,
                healthcare: 3_000.0,
                insurance: 2_000.0,
                entertainment: 4_000.0,
                personal_care: 1_500.0,
                education: 0.0,
                clothing: 1_500.0,
                travel: 5_000.0,
                other: 2_000.0,
            },
            total_debt: 75_000.0,
            total_savings: 0.0,
            total_investments: 0.0,
            current_age: 33,
            lifespan: 90,
            retirement_age: 55,
            investment_return_rate: 6.0,
            emergency_fund_months: 6.0,
            phase1: PhaseAllocation {
                debt: 80.0,
                savings: 10.0,
                investment: 10.0,
            },
            phase2: PhaseAllocation {
                debt: 0.0,
                savings: 70.0,
                investment: 30.0,
            },
            phase3: GrowthAllocation {
                savings: 10.0,
                investment: 90.0,
            },
        }
    }

    /// Unit exchange rates, 500/month expenses, no market return.
    pub(crate) fn hand_calc_inputs() -> FinancialInputs {
        FinancialInputs {
            gross_salary_usd: 1_000.0,
            eur_usd_rate: 1.0,
            thb_eur_rate: 1.0,
            tax_rate: 0.2,
            tax_free_years: 2,
            monthly_expenses: MonthlyExpenses {
                other: 500.0,
                ..MonthlyExpenses::default()
            },
            total_debt: 10_000.0,
            total_savings: 0.0,
            total_investments: 0.0,
            current_age: 30,
            lifespan: 34,
            retirement_age: 34,
            investment_return_rate: 0.0,
            emergency_fund_months: 6.0,
            phase1: PhaseAllocation {
                debt: 80.0,
                savings: 10.0,
                investment: 10.0,
            },
            phase2: PhaseAllocation {
                debt: 0.0,
                savings: 50.0,
                investment: 50.0,
            },
            phase3: GrowthAllocation {
                savings: 0.0,
                investment: 100.0,
            },
        }
    }

    fn working_params() -> SimulationYearParams {
        let mut params = year_params(&hand_calc_inputs(), 60);
        params.age = 31;
        params.years_elapsed = 1;
        params
    }

    #[test]
    fn hand_calculated_trajectory_matches_engine() {
        let result = simulate(&hand_calc_inputs()).expect("valid inputs");
        let rows = &result.trajectory;
        assert_eq!(rows.len(), 5);

        // Age 30: today's snapshot.
        assert_eq!(rows[0].phase, Phase::DebtElimination);
        assert_approx(rows[0].debt, 10_000.0);
        assert_approx(rows[0].free_capital, 0.0);

        // Age 31: the only untaxed working year, free capital 12_000 - 6_000.
        assert_approx(rows[1].income_tax, 0.0);
        assert_approx(rows[1].free_capital, 6_000.0);
        assert_approx(rows[1].debt, 5_200.0);
        assert_approx(rows[1].savings, 600.0);
        assert_approx(rows[1].investments, 600.0);

        // Age 32: third row of the trajectory, salary tax applies.
        assert_approx(rows[2].income_tax, 2_400.0);
        assert_approx(rows[2].net_income, 9_600.0);
        assert_approx(rows[2].free_capital, 3_600.0);
        assert_approx(rows[2].debt, 2_320.0);
        assert_approx(rows[2].savings, 960.0);
        assert_approx(rows[2].investments, 960.0);

        // Age 33: 2_880 debt share pays the last 2_320, 560 spills to savings.
        assert_approx(rows[3].income_tax, 2_400.0);
        assert_approx(rows[3].debt_payment, 2_320.0);
        assert_approx(rows[3].debt, 0.0);
        assert_approx(rows[3].savings, 1_880.0);
        assert_approx(rows[3].investments, 1_320.0);

        // Age 34: retired, 6_000 shortfall drains savings then overdraws investments.
        let last = &rows[4];
        assert_eq!(last.phase, Phase::Retired);
        assert!(last.is_retired);
        assert_approx(last.income_tax, 0.0);
        assert_approx(last.savings_withdrawal, 1_880.0);
        assert_approx(last.investment_sale, 4_120.0);
        assert_approx(last.free_capital, -6_000.0);
        assert_approx(last.safe_withdrawal, 3_200.0);
        assert_approx(last.investments, -2_800.0);

        assert_approx(result.final_wealth, -2_800.0);
        assert_eq!(result.total_years, 5);
        assert_eq!(result.debt_free_age, Some(33));
        assert_eq!(result.wealth_depleted_age, Some(34));
        assert_eq!(result.phases.debt.len(), 4);
        assert_eq!(result.phases.post_retirement.len(), 1);
    }

    #[test]
    fn emergency_phase_uses_phase_two_split_until_target_is_met() {
        let mut inputs = hand_calc_inputs();
        inputs.lifespan = 37;
        inputs.retirement_age = 37;
        inputs.emergency_fund_months = 12.0;

        let result = simulate(&inputs).expect("valid inputs");
        let phases = result
            .trajectory
            .iter()
            .map(|row| row.phase)
            .collect::<Vec<_>>();
        assert_eq!(
            phases,
            vec![
                Phase::DebtElimination,
                Phase::DebtElimination,
                Phase::DebtElimination,
                Phase::DebtElimination,
                Phase::EmergencyFund,
                Phase::EmergencyFund,
                Phase::EmergencyFund,
                Phase::Retired,
            ]
        );
        // Target 6_000; each taxed year adds 1_800 to savings and investments.
        assert_approx(result.trajectory[4].savings, 3_680.0);
        assert_approx(result.trajectory[4].investments, 3_120.0);
        assert_approx(result.trajectory[5].savings, 5_480.0);
        assert_approx(result.trajectory[6].savings, 7_280.0);
        assert_eq!(result.emergency_fund_age, Some(36));
        assert_eq!(result.phases.emergency.len(), 3);
    }

    #[test]
    fn salary_tax_starts_on_third_trajectory_row() {
        let mut inputs = hand_calc_inputs();
        inputs.total_debt = 0.0;
        inputs.lifespan = 33;
        inputs.retirement_age = 33;
        let result = simulate(&inputs).expect("valid inputs");
        let taxes = result
            .trajectory
            .iter()
            .map(|row| row.income_tax)
            .collect::<Vec<_>>();
        assert_eq!(taxes.len(), 4);
        assert_approx(taxes[0], 0.0);
        assert_approx(taxes[1], 0.0);
        assert_approx(taxes[2], 2_400.0);
        assert_approx(taxes[3], 0.0);

        inputs.tax_free_years = 0;
        let result = simulate(&inputs).expect("valid inputs");
        assert_approx(result.trajectory[1].income_tax, 2_400.0);
    }

    #[test]
    fn investment_income_is_taxed_and_folded_into_free_capital() {
        let mut params = working_params();
        params.investments = 10_000.0;
        params.return_rate = 0.10;

        let year = process_year(&params).expect("valid params");
        assert_approx(year.gross_investment_income, 1_000.0);
        assert_approx(year.net_investment_income, 800.0);
        // 12_000 salary (tax free) - 6_000 expenses + 800 net return
        assert_approx(year.free_capital, 6_800.0);
        // No separate compounding on top of the allocated share.
        assert_approx(year.investments, 10_000.0 + 680.0);
    }

    #[test]
    fn retirement_surplus_follows_phase_three_split() {
        let mut params = working_params();
        params.retirement_age = 31;
        params.debt = 0.0;
        params.investments = 100_000.0;
        params.return_rate = 0.10;
        params.tax_rate = 0.0;
        params.phase3 = AllocationFractions {
            debt: 0.0,
            savings: 0.5,
            investment: 0.5,
        };

        let year = process_year(&params).expect("valid params");
        assert!(year.is_retired);
        assert_approx(year.free_capital, 4_000.0);
        assert_approx(year.savings_withdrawal, 0.0);
        assert_approx(year.savings, 2_000.0);
        assert_approx(year.investments, 102_000.0);
        assert_approx(year.safe_withdrawal, 0.0);
    }

    #[test]
    fn retirement_shortfall_draws_savings_before_investments() {
        let mut params = working_params();
        params.retirement_age = 31;
        params.debt = 0.0;
        params.savings = 1_000.0;
        params.investments = 10_000.0;
        params.return_rate = 0.10;
        params.tax_rate = 0.0;

        let year = process_year(&params).expect("valid params");
        assert_approx(year.savings_withdrawal, 1_000.0);
        assert_approx(year.investment_sale, 4_000.0);
        assert_approx(year.savings, 0.0);
        assert_approx(year.investments, 6_000.0);
        assert_approx(year.free_capital, -5_000.0);
        assert_approx(year.gross_income, 0.0);
    }

    #[test]
    fn exhausted_wealth_goes_negative_instead_of_clamping() {
        let mut params = working_params();
        params.retirement_age = 31;
        params.debt = 0.0;
        params.savings = 0.0;
        params.investments = 1_000.0;

        let year = process_year(&params).expect("valid params");
        assert_approx(year.investment_sale, 6_000.0);
        assert_approx(year.investments, -5_000.0);
        assert!(year.savings + year.investments < 0.0);
    }

    #[test]
    fn negative_free_capital_shrinks_savings_without_growing_debt() {
        let mut params = working_params();
        params.annual_expenses = 20_000.0;
        params.savings = 50_000.0;
        params.investments = 50_000.0;

        let year = process_year(&params).expect("valid params");
        assert_approx(year.free_capital, -8_000.0);
        assert_approx(year.debt_payment, 0.0);
        assert_approx(year.debt, params.debt);
        assert_approx(year.savings, 50_000.0 - 8_000.0 * 0.9);
        assert_approx(year.investments, 50_000.0 - 800.0);
    }

    #[test]
    fn scenario_first_year_is_snapshot_and_phase_flips_after_debt_clears() {
        let inputs = sample_inputs();
        let result = simulate(&inputs).expect("valid inputs");
        assert_eq!(result.trajectory.len(), 58);

        let first = &result.trajectory[0];
        assert_eq!(first.age, 33);
        assert_eq!(first.phase, Phase::DebtElimination);
        assert_approx(first.debt, 75_000.0);
        assert_approx(first.savings, 0.0);
        assert_approx(first.investments, 0.0);

        let cleared = result
            .trajectory
            .iter()
            .position(|row| row.debt <= 0.0)
            .expect("debt is paid off");
        assert_eq!(result.trajectory[cleared].phase, Phase::DebtElimination);
        let next = &result.trajectory[cleared + 1];
        assert!(matches!(
            next.phase,
            Phase::EmergencyFund | Phase::RetirementPrep
        ));
        assert_eq!(result.debt_free_age, Some(result.trajectory[cleared].age));
    }

    #[test]
    fn phase_buckets_preserve_trajectory_order() {
        let result = simulate(&sample_inputs()).expect("valid inputs");
        let bucket_total = result.phases.debt.len()
            + result.phases.emergency.len()
            + result.phases.retirement.len()
            + result.phases.post_retirement.len();
        assert_eq!(bucket_total, result.trajectory.len());

        for phase in [
            Phase::DebtElimination,
            Phase::EmergencyFund,
            Phase::RetirementPrep,
            Phase::Retired,
        ] {
            let expected = result
                .trajectory
                .iter()
                .filter(|row| row.phase == phase)
                .cloned()
                .collect::<Vec<_>>();
            assert_eq!(result.phases.bucket(phase), expected.as_slice());
        }
        assert!(result.phases.post_retirement.iter().all(|row| row.age >= 55));
    }

    #[test]
    fn simulate_rejects_invalid_inputs_before_running() {
        let mut inputs = sample_inputs();
        inputs.phase1.debt = 70.0;
        let err = simulate(&inputs).expect_err("allocation sum must be checked");
        assert!(matches!(
            err,
            ValidationError::AllocationSum { phase: "phase1", .. }
        ));

        let mut inputs = sample_inputs();
        inputs.total_savings = -1.0;
        assert!(simulate(&inputs).is_err());

        let mut inputs = sample_inputs();
        inputs.retirement_age = 95;
        assert!(matches!(
            simulate(&inputs),
            Err(ValidationError::AgeOrder { .. })
        ));
    }

    #[test]
    fn single_year_horizon_is_just_the_snapshot() {
        let mut inputs = hand_calc_inputs();
        inputs.current_age = 40;
        inputs.lifespan = 40;
        inputs.retirement_age = 40;
        let result = simulate(&inputs).expect("valid inputs");
        assert_eq!(result.trajectory.len(), 1);
        assert_eq!(result.trajectory[0].phase, Phase::Retired);
        assert_approx(result.final_wealth, 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_trajectory_shape_and_monotone_debt(
            current_age in 18u32..70,
            horizon in 0u32..40,
            retire_offset in 0u32..40,
            salary in 0u32..20_000,
            debt in 0u32..500_000,
            savings in 0u32..200_000,
            investments in 0u32..200_000,
            expense in 0u32..200_000,
            return_bp in -500i32..1200,
            debt_share in 0u32..=100
        ) {
            let mut inputs = sample_inputs();
            inputs.current_age = current_age;
            inputs.lifespan = current_age + horizon;
            inputs.retirement_age = current_age + retire_offset.min(horizon);
            inputs.gross_salary_usd = salary as f64;
            inputs.total_debt = debt as f64;
            inputs.total_savings = savings as f64;
            inputs.total_investments = investments as f64;
            inputs.monthly_expenses = MonthlyExpenses {
                housing: expense as f64 / 12.0,
                ..MonthlyExpenses::default()
            };
            inputs.investment_return_rate = return_bp as f64 / 100.0;
            inputs.phase1 = PhaseAllocation {
                debt: debt_share as f64,
                savings: (100 - debt_share) as f64,
                investment: 0.0,
            };

            let result = simulate(&inputs).unwrap();
            prop_assert!(result.trajectory.len() as u32 == horizon + 1);
            prop_assert!(result.total_years == horizon + 1);

            let first = &result.trajectory[0];
            prop_assert!(first.debt == inputs.total_debt);
            prop_assert!(first.savings == inputs.total_savings);
            prop_assert!(first.investments == inputs.total_investments);

            let mut seen_zero = false;
            for pair in result.trajectory.windows(2) {
                prop_assert!(pair[1].debt >= 0.0);
                prop_assert!(pair[1].debt <= pair[0].debt);
                if pair[0].debt <= 0.0 {
                    seen_zero = true;
                }
                if seen_zero {
                    prop_assert!(pair[1].debt <= 0.0);
                }
            }

            let last = result.trajectory.last().unwrap();
            prop_assert!((result.final_wealth - last.total_wealth).abs() < 1e-6);
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_working_year_conserves_free_capital(
            debt in 0.0f64..100_000.0,
            savings in -50_000.0f64..100_000.0,
            investments in 0.0f64..100_000.0,
            expenses in 0.0f64..40_000.0,
            return_bp in -500i32..1200,
            years_elapsed in 1u32..6
        ) {
            let mut params = working_params();
            params.years_elapsed = years_elapsed;
            params.debt = debt;
            params.savings = savings;
            params.investments = investments;
            params.annual_expenses = expenses;
            params.return_rate = return_bp as f64 / 10_000.0;

            let year = process_year(&params).unwrap();
            prop_assert!(!year.is_retired);
            let moved = (params.debt - year.debt)
                + (year.savings - params.savings)
                + (year.investments - params.investments);
            prop_assert!((moved - year.free_capital).abs() < 1e-6);
            prop_assert!(year.debt >= 0.0 && year.debt <= params.debt);
        }
    }
}
