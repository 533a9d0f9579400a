//! Currency chain helpers: source salary (USD) -> EUR -> local currency (THB).
//!
//! Rates are assumed positive; `FinancialInputs::validate` rejects anything else.

pub fn usd_to_eur(usd: f64, eur_usd_rate: f64) -> f64 {
    usd / eur_usd_rate
}

pub fn eur_to_local(eur: f64, local_eur_rate: f64) -> f64 {
    eur * local_eur_rate
}

pub fn gross_monthly_local(gross_usd: f64, eur_usd_rate: f64, local_eur_rate: f64) -> f64 {
    eur_to_local(usd_to_eur(gross_usd, eur_usd_rate), local_eur_rate)
}
