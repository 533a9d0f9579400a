use clap::Args;

use crate::core::{
    FinancialInputs, GrowthAllocation, MonthlyExpenses, PhaseAllocation, ValidationError,
};

/// Simulation inputs as entered on the command line. Rates and allocations
/// are percentages here and become fractions in `build_inputs`.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct InputArgs {
    #[arg(long, default_value_t = 9_000.0, help = "Monthly gross salary in USD")]
    pub gross_salary_usd: f64,
    #[arg(long, default_value_t = 1.17, help = "USD per EUR")]
    pub eur_usd_rate: f64,
    #[arg(long, default_value_t = 37.75, help = "THB per EUR")]
    pub thb_eur_rate: f64,
    #[arg(long, default_value_t = 17.0, help = "Flat salary tax rate (%)")]
    pub tax_rate: f64,
    #[arg(
        long,
        default_value_t = 2,
        help = "Simulated years before salary tax applies"
    )]
    pub tax_free_years: u32,

    #[arg(long, default_value_t = 25_000.0)]
    pub housing: f64,
    #[arg(long, default_value_t = 3_000.0)]
    pub utilities: f64,
    #[arg(long, default_value_t = 12_000.0)]
    pub food: f64,
    #[arg(long, default_value_t = 4_000.0)]
    pub transportation: f64,
    #[arg(long, default_value_t = 3_000.0)]
    pub healthcare: f64,
    #[arg(long, default_value_t = 2_000.0)]
    pub insurance: f64,
    #[arg(long, default_value_t = 4_000.0)]
    pub entertainment: f64,
    #[arg(long, default_value_t = 1_500.0)]
    pub personal_care: f64,
    #[arg(long, default_value_t = 0.0)]
    pub education: f64,
    #[arg(long, default_value_t = 1_500.0)]
    pub clothing: f64,
    #[arg(long, default_value_t = 5_000.0)]
    pub travel: f64,
    #[arg(long, default_value_t = 2_000.0)]
    pub other: f64,

    #[arg(long, default_value_t = 75_000.0)]
    pub total_debt: f64,
    #[arg(long, default_value_t = 0.0)]
    pub total_savings: f64,
    #[arg(long, default_value_t = 0.0)]
    pub total_investments: f64,

    #[arg(long, default_value_t = 33)]
    pub current_age: u32,
    #[arg(long, default_value_t = 90)]
    pub lifespan: u32,
    #[arg(long, default_value_t = 55)]
    pub retirement_age: u32,

    #[arg(long, default_value_t = 6.0, help = "Annual investment return (%)")]
    pub investment_return_rate: f64,
    #[arg(long, default_value_t = 6.0)]
    pub emergency_fund_months: f64,

    #[arg(long, default_value_t = 80.0)]
    pub phase1_debt: f64,
    #[arg(long, default_value_t = 10.0)]
    pub phase1_savings: f64,
    #[arg(long, default_value_t = 10.0)]
    pub phase1_investment: f64,
    #[arg(long, default_value_t = 0.0)]
    pub phase2_debt: f64,
    #[arg(long, default_value_t = 70.0)]
    pub phase2_savings: f64,
    #[arg(long, default_value_t = 30.0)]
    pub phase2_investment: f64,
    #[arg(long, default_value_t = 10.0)]
    pub phase3_savings: f64,
    #[arg(long, default_value_t = 90.0)]
    pub phase3_investment: f64,
}

impl Default for InputArgs {
    fn default() -> Self {
        Self {
            gross_salary_usd: 9_000.0,
            eur_usd_rate: 1.17,
            thb_eur_rate: 37.75,
            tax_rate: 17.0,
            tax_free_years: 2,
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
            total_debt: 75_000.0,
            total_savings: 0.0,
            total_investments: 0.0,
            current_age: 33,
            lifespan: 90,
            retirement_age: 55,
            investment_return_rate: 6.0,
            emergency_fund_months: 6.0,
            phase1_debt: 80.0,
            phase1_savings: 10.0,
            phase1_investment: 10.0,
            phase2_debt: 0.0,
            phase2_savings: 70.0,
            phase2_investment: 30.0,
            phase3_savings: 10.0,
            phase3_investment: 90.0,
        }
    }
}

/// `monthlyExpenses.personalCare` -> `--personal-care`, `phase1.debt` -> `--phase1-debt`.
fn flag_for(field: &str) -> String {
    let field = field.strip_prefix("monthlyExpenses.").unwrap_or(field);
    let mut flag = String::from("--");
    for ch in field.chars() {
        match ch {
            '.' => flag.push('-'),
            c if c.is_ascii_uppercase() => {
                flag.push('-');
                flag.push(c.to_ascii_lowercase());
            }
            c => flag.push(c),
        }
    }
    flag
}

fn describe(err: &ValidationError) -> String {
    match err {
        ValidationError::AllocationSum { phase, .. } => format!("--{phase}-*: {err}"),
        _ => format!("{}: {err}", flag_for(err.field())),
    }
}

pub fn build_inputs(args: &InputArgs) -> Result<FinancialInputs, String> {
    // Percent here, fraction in `FinancialInputs`.
    if !(0.0..=100.0).contains(&args.tax_rate) {
        return Err("--tax-rate must be between 0 and 100".to_string());
    }

    let monthly_expenses = MonthlyExpenses {
        housing: args.housing,
        utilities: args.utilities,
        food: args.food,
        transportation: args.transportation,
        healthcare: args.healthcare,
        insurance: args.insurance,
        entertainment: args.entertainment,
        personal_care: args.personal_care,
        education: args.education,
        clothing: args.clothing,
        travel: args.travel,
        other: args.other,
    };

    let inputs = FinancialInputs {
        gross_salary_usd: args.gross_salary_usd,
        eur_usd_rate: args.eur_usd_rate,
        thb_eur_rate: args.thb_eur_rate,
        tax_rate: args.tax_rate / 100.0,
        tax_free_years: args.tax_free_years,
        monthly_expenses,
        total_debt: args.total_debt,
        total_savings: args.total_savings,
        total_investments: args.total_investments,
        current_age: args.current_age,
        lifespan: args.lifespan,
        retirement_age: args.retirement_age,
        investment_return_rate: args.investment_return_rate,
        emergency_fund_months: args.emergency_fund_months,
        phase1: PhaseAllocation {
            debt: args.phase1_debt,
            savings: args.phase1_savings,
            investment: args.phase1_investment,
        },
        phase2: PhaseAllocation {
            debt: args.phase2_debt,
            savings: args.phase2_savings,
            investment: args.phase2_investment,
        },
        phase3: GrowthAllocation {
            savings: args.phase3_savings,
            investment: args.phase3_investment,
        },
    };
    inputs.validate().map_err(|e| describe(&e))?;
    Ok(inputs)
}
