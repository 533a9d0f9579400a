mod allocation;
mod cache;
mod convert;
mod engine;
mod error;
mod phase;
mod retirement;
mod solver;
mod types;

pub use allocation::{Allocation, allocate, debt_payment};
pub use cache::{
    CacheEntry, CacheKey, CacheLookup, CacheStats, DEFAULT_CAPACITY, ResultCache, lock_cache,
    shared_cache,
};
pub use convert::{eur_to_local, gross_monthly_local, usd_to_eur};
pub use engine::{partition_by_phase, process_year, simulate};
pub use error::{CacheError, ValidationError};
pub use phase::classify_phase;
pub use retirement::{max_withdrawal, shortfall};
pub use solver::{RetirementAgeSearch, SearchRange, find_optimal_retirement_age, is_sustainable};
pub use types::{
    ALLOCATION_SUM_TOLERANCE, AllocationFractions, FinancialInputs, GrowthAllocation,
    MAX_LIFESPAN, MonthlyExpenses, Phase, PhaseAllocation, PhaseBuckets, SimulationYearParams,
    SimulationYearResult, WealthSimulationResult, YearlySimulationData,
};
