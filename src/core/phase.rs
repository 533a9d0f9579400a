use super::types::Phase;

/// Decides which phase governs a year from that year's starting ledger.
///
/// Nothing is remembered between years: the same ledger always maps to the
/// same phase. Retirement wins over everything else, then outstanding debt,
/// then an unfunded emergency reserve.
pub fn classify_phase(
    age: u32,
    retirement_age: u32,
    debt: f64,
    savings: f64,
    emergency_fund_target: f64,
) -> Phase {
    if age >= retirement_age {
        Phase::Retired
    } else if debt > 0.0 {
        Phase::DebtElimination
    } else if savings < emergency_fund_target {
        Phase::EmergencyFund
    } else {
        Phase::RetirementPrep
    }
}
