#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::engine::run_trajectory;
use super::error::ValidationError;
use super::types::{FinancialInputs, WealthSimulationResult};

/// Inclusive range of candidate retirement ages.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SearchRange {
    pub earliest: u32,
    pub latest: u32,
}

impl SearchRange {
    /// `current_age + 1 ..= lifespan`, collapsed to `lifespan` when there is
    /// no later year to retire in.
    pub fn default_for(inputs: &FinancialInputs) -> Self {
        Self {
            earliest: inputs.current_age.saturating_add(1).min(inputs.lifespan),
            latest: inputs.lifespan,
        }
    }

    /// Default range with either bound replaced; `None` when neither is given.
    pub fn with_overrides(
        inputs: &FinancialInputs,
        earliest: Option<u32>,
        latest: Option<u32>,
    ) -> Option<Self> {
        if earliest.is_none() && latest.is_none() {
            return None;
        }
        let default = Self::default_for(inputs);
        Some(Self {
            earliest: earliest.unwrap_or(default.earliest),
            latest: latest.unwrap_or(default.latest),
        })
    }

    pub fn len(&self) -> u32 {
        self.latest.saturating_sub(self.earliest).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.earliest > self.latest
    }

    fn validate(&self, inputs: &FinancialInputs) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::AgeOrder {
                field: "searchRange",
                reason: format!(
                    "is empty: earliest {} > latest {}",
                    self.earliest, self.latest
                ),
            });
        }
        if self.earliest < inputs.current_age || self.latest > inputs.lifespan {
            return Err(ValidationError::AgeOrder {
                field: "searchRange",
                reason: format!(
                    "{}..={} must lie within currentAge {} and lifespan {}",
                    self.earliest, self.latest, inputs.current_age, inputs.lifespan
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetirementAgeSearch {
    Found {
        retirement_age: u32,
        /// Candidates at or below the chosen age, in ascending order.
        candidates_evaluated: u32,
        result: WealthSimulationResult,
    },
    Infeasible {
        earliest: u32,
        latest: u32,
    },
}

impl RetirementAgeSearch {
    pub fn retirement_age(&self) -> Option<u32> {
        match self {
            RetirementAgeSearch::Found { retirement_age, .. } => Some(*retirement_age),
            RetirementAgeSearch::Infeasible { .. } => None,
        }
    }
}

/// Earliest retirement age whose trajectory never runs out of money once
/// retired. Running out is not an error: it yields `Infeasible`.
pub fn find_optimal_retirement_age(
    inputs: &FinancialInputs,
    range: Option<SearchRange>,
) -> Result<RetirementAgeSearch, ValidationError> {
    let range = range.unwrap_or_else(|| SearchRange::default_for(inputs));
    range.validate(inputs)?;
    // Retirement age is substituted per candidate, so only the rest of the
    // record needs checking; any in-range candidate is a valid retirement age.
    let mut first = inputs.clone();
    first.retirement_age = range.earliest;
    first.validate()?;

    #[cfg(feature = "parallel")]
    let found = search_parallel(inputs, range)?;
    #[cfg(not(feature = "parallel"))]
    let found = search_sequential(inputs, range)?;

    let outcome = match found {
        Some((retirement_age, result)) => {
            tracing::info!(
                retirement_age,
                earliest = range.earliest,
                latest = range.latest,
                final_wealth = result.final_wealth,
                "sustainable retirement age found"
            );
            RetirementAgeSearch::Found {
                retirement_age,
                candidates_evaluated: retirement_age - range.earliest + 1,
                result,
            }
        }
        None => {
            tracing::info!(
                earliest = range.earliest,
                latest = range.latest,
                candidates = range.len(),
                "no sustainable retirement age in range"
            );
            RetirementAgeSearch::Infeasible {
                earliest: range.earliest,
                latest: range.latest,
            }
        }
    };
    Ok(outcome)
}

/// True when no year from `retirement_age` onward has negative total wealth.
pub fn is_sustainable(result: &WealthSimulationResult, retirement_age: u32) -> bool {
    result
        .trajectory
        .iter()
        .filter(|row| row.age >= retirement_age)
        .all(|row| row.total_wealth >= 0.0)
}

fn evaluate_candidate(
    inputs: &FinancialInputs,
    retirement_age: u32,
) -> Option<Result<(u32, WealthSimulationResult), ValidationError>> {
    match run_trajectory(inputs, retirement_age) {
        Ok(result) if is_sustainable(&result, retirement_age) => Some(Ok((retirement_age, result))),
        Ok(_) => None,
        Err(err) => Some(Err(err)),
    }
}

#[cfg(feature = "parallel")]
fn search_parallel(
    inputs: &FinancialInputs,
    range: SearchRange,
) -> Result<Option<(u32, WealthSimulationResult)>, ValidationError> {
    (range.earliest..=range.latest)
        .into_par_iter()
        .find_map_first(|age| evaluate_candidate(inputs, age))
        .transpose()
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn search_sequential(
    inputs: &FinancialInputs,
    range: SearchRange,
) -> Result<Option<(u32, WealthSimulationResult)>, ValidationError> {
    (range.earliest..=range.latest)
        .find_map(|age| evaluate_candidate(inputs, age))
        .transpose()
}
